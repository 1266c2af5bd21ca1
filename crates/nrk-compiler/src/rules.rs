//! The Pratt parse-rule table: a dense, token-indexed table driving a
//! single dispatcher, encoded as plain data rather than a macro-built
//! array of raw function pointers. [`ParseRule`] is three
//! `Option<ParseFn>` slots plus a precedence, where `ParseFn` is an
//! ordinary Rust `fn` pointer.

use crate::compiler::Compiler;
use crate::scanner::TokenKind;

/// Precedence ladder, low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    Assignment,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Call,
    Primary,
}

impl Precedence {
    /// The next precedence level up; used when recursing into a binary
    /// operator's right-hand side to enforce left-associativity.
    pub fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Assignment,
            Precedence::Assignment => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary => Precedence::Call,
            Precedence::Call => Precedence::Primary,
            Precedence::Primary => Precedence::Primary,
        }
    }
}

/// A parsing behavior hung off a token kind. Takes `can_assign` so that
/// `=` is only honored when the surrounding context allows it.
pub type ParseFn = fn(&mut Compiler<'_, '_>, bool);

#[derive(Clone, Copy)]
pub struct ParseRule {
    pub prefix: Option<ParseFn>,
    pub infix: Option<ParseFn>,
    pub postfix: Option<ParseFn>,
    pub precedence: Precedence,
}

const fn rule(
    prefix: Option<ParseFn>,
    infix: Option<ParseFn>,
    postfix: Option<ParseFn>,
    precedence: Precedence,
) -> ParseRule {
    ParseRule {
        prefix,
        infix,
        postfix,
        precedence,
    }
}

/// Look up the rule for `kind`. A `match` over a closed token set plays
/// the role a dense array indexed by token discriminant would, without
/// needing the enum's discriminants to be contiguous or the table to be
/// kept in lockstep by hand at a separate definition site.
pub fn get_rule(kind: TokenKind) -> ParseRule {
    use crate::compiler::rules_impl as r;
    use Precedence as P;
    use TokenKind as T;

    match kind {
        T::LeftParen => rule(Some(r::grouping), None, None, P::None),
        T::Minus => rule(Some(r::unary), Some(r::binary), None, P::Term),
        T::Plus => rule(None, Some(r::binary), None, P::Term),
        T::Slash => rule(None, Some(r::binary), None, P::Factor),
        T::Star => rule(None, Some(r::binary), None, P::Factor),
        T::Bang => rule(Some(r::unary), None, None, P::None),
        T::Tilde => rule(Some(r::unary), None, None, P::None),
        T::BangEqual => rule(None, Some(r::binary), None, P::Equality),
        T::EqualEqual => rule(None, Some(r::binary), None, P::Equality),
        T::Greater => rule(None, Some(r::binary), None, P::Comparison),
        T::GreaterEqual => rule(None, Some(r::binary), None, P::Comparison),
        T::Less => rule(None, Some(r::binary), None, P::Comparison),
        T::LessEqual => rule(None, Some(r::binary), None, P::Comparison),
        T::ShiftLeft => rule(None, Some(r::binary), None, P::Term),
        T::ShiftRight => rule(None, Some(r::binary), None, P::Term),
        T::Amp => rule(None, Some(r::binary), None, P::Term),
        T::Pipe => rule(None, Some(r::binary), None, P::Term),
        T::Caret => rule(None, Some(r::binary), None, P::Term),
        T::Identifier => rule(Some(r::variable), None, None, P::None),
        T::String => rule(Some(r::string), None, None, P::None),
        T::Number => rule(Some(r::number), None, None, P::None),
        T::Nil => rule(Some(r::literal), None, None, P::None),
        T::True => rule(Some(r::literal), None, None, P::None),
        T::False => rule(Some(r::literal), None, None, P::None),
        // `=` and the compound-assignment operators are deliberately absent
        // here: they are consumed inline by `variable()`'s own lookahead,
        // not dispatched through the generic infix loop. An `=` left
        // unconsumed after `parse_precedence` returns is exactly what
        // flags "Invalid assignment target."
        T::PlusPlus | T::MinusMinus => rule(None, None, Some(r::postfix), P::Call),
        _ => rule(None, None, None, P::None),
    }
}
