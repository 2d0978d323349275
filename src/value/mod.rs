pub mod error;
pub mod formatter;

use crate::parser::expression::{InfixOperator, PrefixOperator};
use compact_str::{CompactString, CompactStringExt};
use error::{RuntimeError, RuntimeErrorKind};
use std::fmt::Display;
use std::sync::{Arc, LazyLock};

/// Values are immutable once created and shared by reference.
pub type ObjectRef = Arc<Object>;

static NULL: LazyLock<ObjectRef> = LazyLock::new(|| Arc::new(Object::Null));
static TRUE: LazyLock<ObjectRef> = LazyLock::new(|| Arc::new(Object::Boolean(true)));
static FALSE: LazyLock<ObjectRef> = LazyLock::new(|| Arc::new(Object::Boolean(false)));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Integer,
    Float,
    Boolean,
    String,
    Null,
    Error,
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectType::Integer => write!(f, "INTEGER"),
            ObjectType::Float => write!(f, "FLOAT"),
            ObjectType::Boolean => write!(f, "BOOLEAN"),
            ObjectType::String => write!(f, "STRING"),
            ObjectType::Null => write!(f, "NULL"),
            ObjectType::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(CompactString),
    Null,
    Error(RuntimeError),
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:.6}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Null => write!(f, "null"),
            Self::Error(error) => write!(f, "ERROR: {error}"),
        }
    }
}

// Constructors
impl Object {
    pub fn null() -> ObjectRef {
        Arc::clone(&NULL)
    }

    /// Booleans are always one of two shared instances.
    pub fn boolean(value: bool) -> ObjectRef {
        if value {
            Arc::clone(&TRUE)
        } else {
            Arc::clone(&FALSE)
        }
    }

    pub fn integer(value: i64) -> ObjectRef {
        Arc::new(Object::Integer(value))
    }

    pub fn float(value: f64) -> ObjectRef {
        Arc::new(Object::Float(value))
    }

    pub fn string(value: impl Into<CompactString>) -> ObjectRef {
        Arc::new(Object::String(value.into()))
    }

    pub fn error(error: RuntimeError) -> ObjectRef {
        Arc::new(Object::Error(error))
    }
}

impl Object {
    pub fn get_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Float(_) => ObjectType::Float,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Null => ObjectType::Null,
            Object::Error(_) => ObjectType::Error,
        }
    }

    /// The user-facing rendering used by `echo` and the REPL.
    pub fn inspect(&self) -> String {
        self.to_string()
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Null | Object::Boolean(false))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Object::Error(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }
}

// Prefix operators
impl Object {
    pub fn apply_prefix(&self, operator: PrefixOperator) -> Result<ObjectRef, RuntimeErrorKind> {
        match operator {
            PrefixOperator::Bang => Ok(Object::boolean(!self.is_truthy())),
            PrefixOperator::Minus => match self {
                Object::Integer(v) => v
                    .checked_neg()
                    .map(Object::integer)
                    .ok_or(RuntimeErrorKind::NegationOverflow(*v)),
                Object::Float(v) => Ok(Object::float(-v)),
                other => Err(RuntimeErrorKind::UnknownPrefixOperator {
                    operator,
                    operand: other.get_type(),
                }),
            },
        }
    }
}

// Infix operators
impl Object {
    pub fn apply_infix(
        lhs: &ObjectRef,
        operator: InfixOperator,
        rhs: &ObjectRef,
    ) -> Result<ObjectRef, RuntimeErrorKind> {
        match operator {
            InfixOperator::And => return Ok(Object::boolean(lhs.is_truthy() && rhs.is_truthy())),
            InfixOperator::Or => return Ok(Object::boolean(lhs.is_truthy() || rhs.is_truthy())),
            _ => {}
        }

        match (lhs.as_ref(), rhs.as_ref()) {
            (Object::Integer(l), Object::Integer(r)) => Self::integer_infix(*l, operator, *r),
            (Object::Float(l), Object::Float(r)) => Self::float_infix(*l, operator, *r),
            (Object::Float(l), Object::Integer(r)) => Self::float_infix(*l, operator, *r as f64),
            (Object::Integer(l), Object::Float(r)) => Self::float_infix(*l as f64, operator, *r),
            _ if operator == InfixOperator::EqualEqual => {
                Ok(Object::boolean(Self::same(lhs, rhs)))
            }
            _ if operator == InfixOperator::BangEqual => {
                Ok(Object::boolean(!Self::same(lhs, rhs)))
            }
            (Object::String(l), Object::String(r)) if operator == InfixOperator::Add => {
                Ok(Object::string([l, r].concat_compact()))
            }
            (l, r) if l.get_type() != r.get_type() => Err(RuntimeErrorKind::TypeMismatch {
                lhs: l.get_type(),
                operator,
                rhs: r.get_type(),
            }),
            (l, r) => Err(RuntimeErrorKind::UnknownInfixOperator {
                lhs: l.get_type(),
                operator,
                rhs: r.get_type(),
            }),
        }
    }

    /// Equality for non-numeric operands: strings by content, every other
    /// value by identity.
    fn same(lhs: &ObjectRef, rhs: &ObjectRef) -> bool {
        match (lhs.as_ref(), rhs.as_ref()) {
            (Object::String(l), Object::String(r)) => l == r,
            (Object::Boolean(l), Object::Boolean(r)) => l == r,
            (Object::Null, Object::Null) => true,
            _ => Arc::ptr_eq(lhs, rhs),
        }
    }

    fn integer_infix(
        lhs: i64,
        operator: InfixOperator,
        rhs: i64,
    ) -> Result<ObjectRef, RuntimeErrorKind> {
        let overflow = || RuntimeErrorKind::IntegerOverflow { lhs, operator, rhs };
        let value = match operator {
            InfixOperator::Add => lhs.checked_add(rhs).ok_or_else(overflow)?,
            InfixOperator::Subtract => lhs.checked_sub(rhs).ok_or_else(overflow)?,
            InfixOperator::Multiply => lhs.checked_mul(rhs).ok_or_else(overflow)?,
            InfixOperator::Divide if rhs == 0 => return Err(RuntimeErrorKind::DivisionByZero),
            InfixOperator::Divide => lhs.checked_div(rhs).ok_or_else(overflow)?,
            InfixOperator::Modulo if rhs == 0 => return Err(RuntimeErrorKind::ModuloByZero),
            InfixOperator::Modulo => lhs.checked_rem(rhs).ok_or_else(overflow)?,
            // Computed in floating point and truncated, saturating at the i64 range.
            InfixOperator::Power => (lhs as f64).powf(rhs as f64) as i64,
            InfixOperator::LessThan => return Ok(Object::boolean(lhs < rhs)),
            InfixOperator::LessThanEqual => return Ok(Object::boolean(lhs <= rhs)),
            InfixOperator::GreaterThan => return Ok(Object::boolean(lhs > rhs)),
            InfixOperator::GreaterThanEqual => return Ok(Object::boolean(lhs >= rhs)),
            InfixOperator::EqualEqual => return Ok(Object::boolean(lhs == rhs)),
            InfixOperator::BangEqual => return Ok(Object::boolean(lhs != rhs)),
            InfixOperator::And | InfixOperator::Or => {
                return Err(RuntimeErrorKind::UnknownInfixOperator {
                    lhs: ObjectType::Integer,
                    operator,
                    rhs: ObjectType::Integer,
                })
            }
        };
        Ok(Object::integer(value))
    }

    fn float_infix(
        lhs: f64,
        operator: InfixOperator,
        rhs: f64,
    ) -> Result<ObjectRef, RuntimeErrorKind> {
        let value = match operator {
            InfixOperator::Add => lhs + rhs,
            InfixOperator::Subtract => lhs - rhs,
            InfixOperator::Multiply => lhs * rhs,
            InfixOperator::Divide if rhs == 0.0 => return Err(RuntimeErrorKind::DivisionByZero),
            InfixOperator::Divide => lhs / rhs,
            InfixOperator::Modulo if rhs == 0.0 => return Err(RuntimeErrorKind::ModuloByZero),
            InfixOperator::Modulo => lhs % rhs,
            InfixOperator::Power => lhs.powf(rhs),
            InfixOperator::LessThan => return Ok(Object::boolean(lhs < rhs)),
            InfixOperator::LessThanEqual => return Ok(Object::boolean(lhs <= rhs)),
            InfixOperator::GreaterThan => return Ok(Object::boolean(lhs > rhs)),
            InfixOperator::GreaterThanEqual => return Ok(Object::boolean(lhs >= rhs)),
            InfixOperator::EqualEqual => return Ok(Object::boolean(lhs == rhs)),
            InfixOperator::BangEqual => return Ok(Object::boolean(lhs != rhs)),
            InfixOperator::And | InfixOperator::Or => {
                return Err(RuntimeErrorKind::UnknownInfixOperator {
                    lhs: ObjectType::Float,
                    operator,
                    rhs: ObjectType::Float,
                })
            }
        };
        Ok(Object::float(value))
    }
}
