//! Operator table
//!
//! Every operator has one semantic identity ([`OperatorKind`]) and any number of
//! textual spellings. A spelling may denote different kinds depending on whether
//! it appears in infix, prefix or postfix position (`-` is both Subtract and
//! Negate, `!` is both Not and Factorial); the tokenizer decides which from the
//! preceding token.

use crate::value::DataTypes;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperatorKind {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,

    // Bitwise
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,

    // Comparison
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,

    // Logical
    And,
    Or,

    // Unary
    Negate,
    Identity,
    Not,
    BitwiseNot,
    SquareRoot,
    Factorial,

    Conditional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OperatorCategory {
    Arithmetic,
    Bitwise,
    Comparison,
    Logical,
    Unary,
    Conditional,
}

/// Static properties of an operator kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Operator {
    pub precedence: u8,
    pub associativity: Associativity,
    pub valid_types: DataTypes,
    pub category: OperatorCategory,
}

const fn op(
    precedence: u8,
    associativity: Associativity,
    valid_types: DataTypes,
    category: OperatorCategory,
) -> Operator {
    Operator {
        precedence,
        associativity,
        valid_types,
        category,
    }
}

/// Precedence given to every prefix operator; binds tighter than any binary operator
pub const PREFIX_PRECEDENCE: u8 = 13;

impl OperatorKind {
    pub fn operator(&self) -> Operator {
        use Associativity::{Left, Right};
        use OperatorCategory as C;
        use OperatorKind::*;

        let numeric = DataTypes::NUMBER;
        let ordered = DataTypes::NUMBER
            .union(DataTypes::STRING)
            .union(DataTypes::DATE);
        match self {
            Conditional => op(1, Right, DataTypes::BOOLEAN, C::Conditional),
            Or => op(2, Left, DataTypes::BOOLEAN, C::Logical),
            And => op(3, Left, DataTypes::BOOLEAN, C::Logical),
            BitwiseOr => op(4, Left, numeric, C::Bitwise),
            BitwiseXor => op(5, Left, numeric.union(DataTypes::BOOLEAN), C::Bitwise),
            BitwiseAnd => op(6, Left, numeric, C::Bitwise),
            Equal | NotEqual => op(7, Left, DataTypes::ANY, C::Comparison),
            Less | LessOrEqual | Greater | GreaterOrEqual => op(8, Left, ordered, C::Comparison),
            ShiftLeft | ShiftRight => op(9, Left, numeric, C::Bitwise),
            Add => op(10, Left, ordered, C::Arithmetic),
            Subtract => op(10, Left, numeric.union(DataTypes::DATE), C::Arithmetic),
            Multiply | Divide | Modulo => op(11, Left, numeric, C::Arithmetic),
            Power => op(12, Right, numeric, C::Arithmetic),
            Negate | Identity | BitwiseNot | SquareRoot => {
                op(PREFIX_PRECEDENCE, Right, numeric, C::Unary)
            }
            Not => op(PREFIX_PRECEDENCE, Right, DataTypes::BOOLEAN, C::Unary),
            Factorial => op(14, Left, numeric, C::Unary),
        }
    }

    pub fn precedence(&self) -> u8 {
        self.operator().precedence
    }

    pub fn associativity(&self) -> Associativity {
        self.operator().associativity
    }

    pub fn category(&self) -> OperatorCategory {
        self.operator().category
    }

    /// Canonical ASCII spelling, used in diagnostics
    pub fn symbol(&self) -> &'static str {
        use OperatorKind::*;
        match self {
            Add | Identity => "+",
            Subtract | Negate => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
            Power => "^",
            BitwiseAnd => "&",
            BitwiseOr => "|",
            BitwiseXor => "^^",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            LessOrEqual => "<=",
            Greater => ">",
            GreaterOrEqual => ">=",
            And => "&&",
            Or => "||",
            Not | Factorial => "!",
            BitwiseNot => "~",
            SquareRoot => "√",
            Conditional => "?:",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The kinds one textual spelling resolves to, by position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorSpelling {
    pub infix: Option<OperatorKind>,
    pub prefix: Option<OperatorKind>,
    pub postfix: Option<OperatorKind>,
}

impl OperatorSpelling {
    pub const fn infix(kind: OperatorKind) -> Self {
        Self {
            infix: Some(kind),
            prefix: None,
            postfix: None,
        }
    }

    pub const fn prefix(kind: OperatorKind) -> Self {
        Self {
            infix: None,
            prefix: Some(kind),
            postfix: None,
        }
    }

    /// Merge another spelling's positions into this one; `other` wins on conflict
    pub fn merge(self, other: OperatorSpelling) -> Self {
        Self {
            infix: other.infix.or(self.infix),
            prefix: other.prefix.or(self.prefix),
            postfix: other.postfix.or(self.postfix),
        }
    }
}

/// Default spellings, ASCII and Unicode aliases included
pub fn default_spellings() -> Vec<(&'static str, OperatorSpelling)> {
    use OperatorKind::*;
    let both = |infix, prefix| OperatorSpelling {
        infix: Some(infix),
        prefix: Some(prefix),
        postfix: None,
    };
    vec![
        ("+", both(Add, Identity)),
        ("-", both(Subtract, Negate)),
        ("\u{2212}", both(Subtract, Negate)),
        ("*", OperatorSpelling::infix(Multiply)),
        ("\u{00d7}", OperatorSpelling::infix(Multiply)),
        ("/", OperatorSpelling::infix(Divide)),
        ("\u{00f7}", OperatorSpelling::infix(Divide)),
        ("%", OperatorSpelling::infix(Modulo)),
        ("^", OperatorSpelling::infix(Power)),
        ("&", OperatorSpelling::infix(BitwiseAnd)),
        ("|", OperatorSpelling::infix(BitwiseOr)),
        ("^^", OperatorSpelling::infix(BitwiseXor)),
        ("\u{2295}", OperatorSpelling::infix(BitwiseXor)),
        ("<<", OperatorSpelling::infix(ShiftLeft)),
        (">>", OperatorSpelling::infix(ShiftRight)),
        ("==", OperatorSpelling::infix(Equal)),
        ("=", OperatorSpelling::infix(Equal)),
        ("!=", OperatorSpelling::infix(NotEqual)),
        ("<>", OperatorSpelling::infix(NotEqual)),
        ("\u{2260}", OperatorSpelling::infix(NotEqual)),
        ("<", OperatorSpelling::infix(Less)),
        ("<=", OperatorSpelling::infix(LessOrEqual)),
        ("\u{2264}", OperatorSpelling::infix(LessOrEqual)),
        (">", OperatorSpelling::infix(Greater)),
        (">=", OperatorSpelling::infix(GreaterOrEqual)),
        ("\u{2265}", OperatorSpelling::infix(GreaterOrEqual)),
        ("&&", OperatorSpelling::infix(And)),
        ("\u{2227}", OperatorSpelling::infix(And)),
        ("||", OperatorSpelling::infix(Or)),
        ("\u{2228}", OperatorSpelling::infix(Or)),
        (
            "!",
            OperatorSpelling {
                infix: None,
                prefix: Some(Not),
                postfix: Some(Factorial),
            },
        ),
        ("\u{00ac}", OperatorSpelling::prefix(Not)),
        ("~", OperatorSpelling::prefix(BitwiseNot)),
        ("\u{221a}", OperatorSpelling::prefix(SquareRoot)),
    ]
}
