//! Parser for the subset of FHIRPath used by the model's invariants.
//!
//! Supported: member navigation, the functions `exists()`, `empty()`,
//! `not()`, `hasValue()` and `count()`, `=` / `!=`, `and`, `or`, `xor`,
//! `implies`, parentheses, and boolean, string and integer literals.
//! Anything else (comparisons, functions with arguments) fails to parse.

use chumsky::Parser;
use chumsky::error::Rich;
use chumsky::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Boolean(bool),
    String(String),
    Integer(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    /// A member of the focus: `name`.
    Member(String),
    /// `left.name`
    Path(Box<Expression>, String),
    /// `left.name()`
    Function(Box<Expression>, String),
    /// `=` or, when the flag is set, `!=`.
    Equality(Box<Expression>, bool, Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Xor(Box<Expression>, Box<Expression>),
    Implies(Box<Expression>, Box<Expression>),
}

pub const FUNCTIONS: &[&str] = &["exists", "empty", "not", "hasValue", "count"];

impl Expression {
    /// Function names called anywhere in the expression.
    pub fn functions(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_functions(&mut names);
        names
    }

    fn collect_functions<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expression::Literal(_) | Expression::Member(_) => {}
            Expression::Path(left, _) => left.collect_functions(names),
            Expression::Function(left, name) => {
                left.collect_functions(names);
                names.push(name);
            }
            Expression::Equality(left, _, right)
            | Expression::And(left, right)
            | Expression::Or(left, right)
            | Expression::Xor(left, right)
            | Expression::Implies(left, right) => {
                left.collect_functions(names);
                right.collect_functions(names);
            }
        }
    }
}

pub fn parser<'src>() -> impl Parser<'src, &'src str, Expression, extra::Err<Rich<'src, char>>> + Clone + 'src {
    // IDENTIFIER: ([A-Za-z] | '_')([A-Za-z0-9] | '_')*
    let identifier = any()
        .filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
                .repeated()
                .collect::<Vec<_>>(),
        )
        .map(|(first, rest): (char, Vec<char>)| {
            let mut s = first.to_string();
            s.extend(rest);
            s
        });

    let boolean = choice((
        text::keyword("true").to(Literal::Boolean(true)),
        text::keyword("false").to(Literal::Boolean(false)),
    ));

    let string = just('\'')
        .ignore_then(none_of("'").repeated().collect::<String>())
        .then_ignore(just('\''))
        .map(Literal::String);

    let integer = any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .collect::<String>()
        .try_map(|digits: String, span| match digits.parse::<i64>() {
            Ok(n) => Ok(Literal::Integer(n)),
            Err(_) => Err(Rich::custom(span, format!("Invalid integer: {}", digits))),
        });

    recursive(|expr| {
        let atom = choice((
            choice((boolean, string, integer)).map(Expression::Literal).boxed(),
            identifier.clone().map(Expression::Member).boxed(),
            expr.clone()
                .boxed()
                .delimited_by(just('(').padded(), just(')').padded())
                .boxed(),
        ))
        .padded();

        // '.' identifier, optionally followed by an empty argument list
        let postfix_op = just('.')
            .ignore_then(identifier.clone())
            .then(just('(').padded().ignore_then(just(')')).or_not())
            .map(|(name, call)| (name, call.is_some()));

        let invocation = atom
            .then(postfix_op.repeated().collect::<Vec<_>>())
            .map(|(left, ops)| {
                ops.into_iter().fold(left, |acc, (name, call)| {
                    if call {
                        Expression::Function(Box::new(acc), name)
                    } else {
                        Expression::Path(Box::new(acc), name)
                    }
                })
            })
            .padded()
            .boxed();

        let op_eq = choice((just("!=").to(true), just('=').to(false))).padded();
        let equality = invocation
            .clone()
            .then(op_eq.then(invocation).repeated().collect::<Vec<_>>())
            .map(|(left, ops)| {
                ops.into_iter().fold(left, |acc, (negated, right)| {
                    Expression::Equality(Box::new(acc), negated, Box::new(right))
                })
            })
            .boxed();

        let op_and = text::keyword("and").padded();
        let logical_and = equality
            .clone()
            .then(op_and.ignore_then(equality).repeated().collect::<Vec<_>>())
            .map(|(left, ops)| {
                ops.into_iter().fold(left, |acc, right| Expression::And(Box::new(acc), Box::new(right)))
            })
            .boxed();

        let op_or = choice((text::keyword("or").to(false), text::keyword("xor").to(true))).padded();
        let logical_or = logical_and
            .clone()
            .then(op_or.then(logical_and).repeated().collect::<Vec<_>>())
            .map(|(left, ops)| {
                ops.into_iter().fold(left, |acc, (exclusive, right)| {
                    if exclusive {
                        Expression::Xor(Box::new(acc), Box::new(right))
                    } else {
                        Expression::Or(Box::new(acc), Box::new(right))
                    }
                })
            })
            .boxed();

        let op_implies = text::keyword("implies").padded();
        logical_or
            .clone()
            .then(op_implies.ignore_then(logical_or).repeated().collect::<Vec<_>>())
            .map(|(left, ops)| {
                ops.into_iter().fold(left, |acc, right| Expression::Implies(Box::new(acc), Box::new(right)))
            })
    })
    .then_ignore(end())
}

/// Parses `expr`, joining chumsky's errors into one message.
pub fn parse(expr: &str) -> Result<Expression, String> {
    parser().parse(expr).into_result().map_err(|errs| {
        errs.into_iter()
            .map(|e| format!("{:?}", e))
            .collect::<Vec<_>>()
            .join("; ")
    })
}
