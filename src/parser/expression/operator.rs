use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Bang,
    Minus,
}

impl PrefixOperator {
    pub fn get_binding_power(&self) -> u8 {
        match self {
            // 1. Prefix operators
            PrefixOperator::Bang | PrefixOperator::Minus => 15,
        }
    }
}

impl Display for PrefixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefixOperator::Bang => write!(f, "!"),
            PrefixOperator::Minus => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    Power,
    Multiply,
    Divide,
    Modulo,
    Add,
    Subtract,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    EqualEqual,
    BangEqual,
    And,
    Or,
}

impl InfixOperator {
    /// Returns `(left, right)` binding powers. A right power lower than the
    /// left one makes the operator right associative.
    pub fn get_binding_power(&self) -> (u8, u8) {
        match self {
            // 2. Exponent
            Self::Power => (14, 13),
            // 3. Multiplicative operators
            Self::Multiply | Self::Divide | Self::Modulo => (11, 12),
            // 4. Additive operators
            Self::Add | Self::Subtract => (9, 10),
            // 5. Comparison operators
            Self::LessThan | Self::LessThanEqual | Self::GreaterThan | Self::GreaterThanEqual => {
                (7, 8)
            }
            // 6. Equality operators
            Self::EqualEqual | Self::BangEqual => (5, 6),
            // 7. Logical AND
            Self::And => (3, 4),
            // 8. Logical OR
            Self::Or => (1, 2),
        }
    }
}

impl Display for InfixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Power => "**",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::LessThan => "<",
            Self::LessThanEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanEqual => ">=",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::And => "&&",
            Self::Or => "||",
        };
        write!(f, "{symbol}")
    }
}
