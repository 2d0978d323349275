use super::{Environment, SystemContext, Tracer, MAX_EVALUATION_DEPTH};
use crate::parser::{
    expression::{Expression, ExpressionAtom, ExpressionAtomKind, ExpressionNode, ExpressionNodeRef},
    statement::{
        BindingKind, BlockStatement, ExpressionStatement, IfExpression, PrintStatement,
        Statement, VariableDeclaration,
    },
    Program,
};
use crate::token::Location;
use crate::value::{
    error::{RuntimeError, RuntimeErrorKind},
    Object, ObjectRef,
};
use crate::MAX_BLOCK_DEPTH;

pub struct TreeWalkInterpreter<C: SystemContext> {
    environment: Environment,
    context: C,
    tracer: Tracer,
    depth: usize,
    block_depth: usize,
}

impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    pub fn new(context: C) -> Self {
        Self::with_environment(Environment::new(), context)
    }

    pub fn with_environment(environment: Environment, context: C) -> Self {
        Self {
            environment,
            context,
            tracer: Tracer::disabled(),
            depth: 0,
            block_depth: 0,
        }
    }

    pub fn with_tracer(mut self, tracer: Tracer) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn get_environment(&self) -> &Environment {
        &self.environment
    }

    /// Drops every binding by starting over with an empty root scope.
    pub fn reset_environment(&mut self) {
        self.environment = Environment::new();
    }

    pub fn get_tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    pub fn get_context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// Runs the program, folding a runtime error into an `Object::Error` value.
    pub fn run(&mut self, program: &Program) -> ObjectRef {
        match self.try_run(program) {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(%error, code = error.code(), "runtime error");
                Object::error(error)
            }
        }
    }

    /// Runs the program and yields the value of its last statement, or null when it has none.
    /// The first runtime error stops execution.
    pub fn try_run(&mut self, program: &Program) -> Result<ObjectRef, RuntimeError> {
        let environment = self.environment.clone();
        let mut result = Object::null();
        for statement in program.iter() {
            result = self.interpret_statement(&environment, statement)?;
        }
        Ok(result)
    }

    /// Runs `interpret` one level deeper, refusing to recurse past the limit.
    fn nested<T>(
        &mut self,
        location: Location,
        interpret: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        if self.depth >= MAX_EVALUATION_DEPTH {
            return Err(RuntimeError::new(
                RuntimeErrorKind::NestingTooDeep(MAX_EVALUATION_DEPTH),
                location,
            ));
        }
        self.depth += 1;
        let result = interpret(self);
        self.depth -= 1;
        result
    }
}

// Statement interpreter
impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    fn interpret_statement(
        &mut self,
        environment: &Environment,
        statement: &Statement,
    ) -> Result<ObjectRef, RuntimeError> {
        let location = statement.get_location();
        let kind = Self::describe(statement);
        self.tracer.trace(format_args!(
            "[{}:{}] {kind}",
            location.line, location.column
        ));
        let result = match statement {
            Statement::VariableDeclaration(decl) => {
                self.interpret_variable_declaration(environment, decl)
            }
            Statement::Print(stmt) => self.interpret_print_statement(environment, stmt),
            Statement::Expression(stmt) => self.interpret_expression_statement(environment, stmt),
            Statement::If(stmt) => self.interpret_if_expression(environment, stmt),
        };
        match result {
            Ok(ref value) => self.tracer.trace(format_args!(
                "[{}:{}] {kind} => {value}",
                location.line, location.column
            )),
            Err(ref error) => self.tracer.trace(format_args!(
                "[{}:{}] {kind} => ERROR: {error}",
                location.line, location.column
            )),
        }
        result
    }

    fn describe(statement: &Statement) -> &'static str {
        match statement {
            Statement::VariableDeclaration(VariableDeclaration {
                binding: BindingKind::Declaration,
                ..
            }) => "declare",
            Statement::VariableDeclaration(_) => "assign",
            Statement::Print(_) => "echo",
            Statement::Expression(_) => "expression",
            Statement::If(_) => "if",
        }
    }

    fn interpret_variable_declaration(
        &mut self,
        environment: &Environment,
        decl: &VariableDeclaration,
    ) -> Result<ObjectRef, RuntimeError> {
        let value = self.evaluate(environment, &decl.value)?;
        match decl.binding {
            BindingKind::Declaration => environment.declare(&decl.name.name, value.clone()),
            BindingKind::Reassignment => environment.assign(&decl.name.name, value.clone()),
        }
        Ok(value)
    }

    fn interpret_print_statement(
        &mut self,
        environment: &Environment,
        stmt: &PrintStatement,
    ) -> Result<ObjectRef, RuntimeError> {
        let value = self.evaluate(environment, &stmt.value)?;
        self.context.writeln(&value.inspect());
        Ok(value)
    }

    fn interpret_expression_statement(
        &mut self,
        environment: &Environment,
        stmt: &ExpressionStatement,
    ) -> Result<ObjectRef, RuntimeError> {
        self.evaluate(environment, &stmt.expr)
    }

    fn interpret_if_expression(
        &mut self,
        environment: &Environment,
        stmt: &IfExpression,
    ) -> Result<ObjectRef, RuntimeError> {
        let condition = self.evaluate(environment, &stmt.condition)?;
        if condition.is_truthy() {
            self.interpret_block_statement(environment, &stmt.consequence)
        } else if let Some(ref alternative) = stmt.alternative {
            self.interpret_block_statement(environment, alternative)
        } else {
            Ok(Object::null())
        }
    }

    /// Runs the block in a fresh child scope and yields its last value.
    fn interpret_block_statement(
        &mut self,
        environment: &Environment,
        block: &BlockStatement,
    ) -> Result<ObjectRef, RuntimeError> {
        if self.block_depth >= MAX_BLOCK_DEPTH {
            return Err(RuntimeError::new(
                RuntimeErrorKind::NestingTooDeep(MAX_BLOCK_DEPTH),
                block.location,
            ));
        }
        self.tracer.trace(format_args!(
            "[{}:{}] block",
            block.location.line, block.location.column
        ));

        self.block_depth += 1;
        let result = self.nested(block.location, |interpreter| {
            let scope = environment.new_scope();
            interpreter.tracer.indent();
            let mut result = Ok(Object::null());
            for statement in block.statements.iter() {
                result = interpreter.interpret_statement(&scope, statement);
                if result.is_err() {
                    break;
                }
            }
            interpreter.tracer.dedent();
            result
        });
        self.block_depth -= 1;
        result
    }
}

// Expression evaluator
impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    pub fn evaluate(
        &mut self,
        environment: &Environment,
        expr: &Expression,
    ) -> Result<ObjectRef, RuntimeError> {
        self.evaluate_node(environment, expr, expr.get_root_ref())
    }

    fn evaluate_node(
        &mut self,
        environment: &Environment,
        expr: &Expression,
        node: ExpressionNodeRef,
    ) -> Result<ObjectRef, RuntimeError> {
        let current = expr
            .get_node(node)
            .expect("Node references always point into their own tree.");

        self.nested(current.get_location(), |interpreter| match current {
            ExpressionNode::Atom(atom) => Self::evaluate_atom(environment, atom),
            ExpressionNode::Prefix {
                operator,
                rhs,
                location,
            } => {
                let rhs = interpreter.evaluate_node(environment, expr, *rhs)?;
                rhs.apply_prefix(*operator)
                    .map_err(|kind| RuntimeError::new(kind, *location))
            }
            ExpressionNode::Infix { .. } => {
                interpreter.evaluate_infix_chain(environment, expr, node)
            }
        })
    }

    /// Evaluates an infix node by walking its left spine in a loop, so long left associative
    /// chains like `1 + 2 + 3 + ...` only recurse into right operands.
    fn evaluate_infix_chain(
        &mut self,
        environment: &Environment,
        expr: &Expression,
        node: ExpressionNodeRef,
    ) -> Result<ObjectRef, RuntimeError> {
        let mut spine = Vec::new();
        let mut cursor = node;
        while let Some(&ExpressionNode::Infix {
            operator,
            lhs,
            rhs,
            location,
        }) = expr.get_node(cursor)
        {
            spine.push((operator, rhs, location));
            cursor = lhs;
        }

        let mut value = self.evaluate_node(environment, expr, cursor)?;
        for (operator, rhs, location) in spine.into_iter().rev() {
            let rhs = self.evaluate_node(environment, expr, rhs)?;
            value = Object::apply_infix(&value, operator, &rhs)
                .map_err(|kind| RuntimeError::new(kind, location))?;
        }
        Ok(value)
    }

    fn evaluate_atom(
        environment: &Environment,
        atom: &ExpressionAtom,
    ) -> Result<ObjectRef, RuntimeError> {
        let value = match atom.kind {
            ExpressionAtomKind::Integer(v) => Object::integer(v),
            ExpressionAtomKind::Float(v) => Object::float(v),
            ExpressionAtomKind::Bool(v) => Object::boolean(v),
            ExpressionAtomKind::StringLiteral(ref v) => Object::string(v.clone()),
            ExpressionAtomKind::Identifier(ref name) => {
                environment.get(name).ok_or_else(|| {
                    RuntimeError::new(
                        RuntimeErrorKind::IdentifierNotFound(name.clone()),
                        atom.location,
                    )
                })?
            }
        };
        Ok(value)
    }
}
