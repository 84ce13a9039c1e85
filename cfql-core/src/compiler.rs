use std::collections::HashSet;

use serde::Serialize;

use crate::error::{CfqlError, CfqlResult};
use crate::lexer::{Lexer, Token, Value};

/// A compiled filter: a boolean expression suitable for the WHERE clause of
/// an SQL query, plus the positional arguments it references. `$1..$N` in
/// the expression line up with `arguments` index for index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Filter {
    pub expression: String,
    pub arguments: Vec<Value>,
}

impl Filter {
    /// Build a filter from an already-trusted expression, bypassing field
    /// validation. Used by internal call sites for lookups like `id = $1`.
    pub fn raw(expression: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            expression: expression.into(),
            arguments,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expression.is_empty()
    }
}

/// An entry on the evaluation stack. `bare` marks a plain field reference or
/// placeholder, which needs no parentheses when nested inside a larger
/// expression; anything synthesized by an operator gets wrapped.
struct StackValue {
    text: String,
    bare: bool,
}

fn bracketed(value: &StackValue) -> String {
    if value.bare {
        value.text.clone()
    } else {
        format!("({})", value.text)
    }
}

const OPERATORS: [&str; 9] = ["=", "<", "<=", ">", ">=", "+", "-", "and", "or"];

/// Compile a postfix filter expression into a [`Filter`].
///
/// Tokens are comma-separated. Each operator reduces the two most recently
/// pushed operands, the earlier one on the left, so `price,100,<` compiles
/// to `price < $1`. Field references must appear in `allowed_fields`
/// (case-sensitive); literals become positional placeholders numbered in
/// scan order. The whole compile is atomic: the result is either a complete
/// filter or an error, never both.
pub fn compile(allowed_fields: &[&str], input: &str) -> CfqlResult<Filter> {
    let known: HashSet<&str> = allowed_fields.iter().copied().collect();
    let mut lexer = Lexer::new(input);
    let mut stack: Vec<StackValue> = Vec::new();
    let mut arguments: Vec<Value> = Vec::new();

    while let Some(token) = lexer.next_token()? {
        match token {
            Token::Literal(value) => {
                stack.push(StackValue {
                    text: format!("${}", arguments.len() + 1),
                    bare: true,
                });
                arguments.push(value);
            }
            Token::Identifier(name) => {
                if !known.contains(name.as_str()) {
                    return Err(CfqlError::UnknownField(name));
                }
                stack.push(StackValue { text: name, bare: true });
            }
            Token::Operator(op) => {
                if !OPERATORS.contains(&op.as_str()) {
                    return Err(CfqlError::UnknownOperator(op));
                }
                let (right, left) = match (stack.pop(), stack.pop()) {
                    (Some(right), Some(left)) => (right, left),
                    _ => return Err(CfqlError::InsufficientOperands(op)),
                };
                stack.push(StackValue {
                    text: format!("{} {} {}", bracketed(&left), op, bracketed(&right)),
                    bare: false,
                });
            }
        }
    }

    if stack.len() > 1 {
        return Err(CfqlError::UnbalancedExpression(stack.len()));
    }
    match stack.pop() {
        Some(top) => Ok(Filter {
            expression: top.text,
            arguments,
        }),
        None => Ok(Filter::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_expression() {
        assert_eq!(compile(&[], "").unwrap(), Filter::default());
        assert_eq!(compile(&["first", "second"], "").unwrap(), Filter::default());
    }

    #[test]
    fn test_simple_comparison() {
        let filter = compile(&["id"], "id,5,=").unwrap();
        assert_eq!(filter.expression, "id = $1");
        assert_eq!(filter.arguments, vec![Value::Integer(5)]);
    }

    #[test]
    fn test_string_literal() {
        let filter = compile(&["first"], r#"first,"value",="#).unwrap();
        assert_eq!(filter.expression, "first = $1");
        assert_eq!(filter.arguments, vec![Value::Text("value".to_string())]);
    }

    #[test]
    fn test_two_literals_no_fields() {
        let filter = compile(&[], "-10,+10,=").unwrap();
        assert_eq!(filter.expression, "$1 = $2");
        assert_eq!(
            filter.arguments,
            vec![Value::Integer(-10), Value::Integer(10)]
        );
    }

    #[test]
    fn test_arithmetic_operand_gets_parenthesized() {
        let filter = compile(&["first"], "first,10.5,1,-,=").unwrap();
        assert_eq!(filter.expression, "first = ($1 - $2)");
        assert_eq!(
            filter.arguments,
            vec![Value::Float(10.5), Value::Integer(1)]
        );
    }

    #[test]
    fn test_complex_expression() {
        let filter = compile(
            &["first", "second", "third"],
            r#"first,10,<,second,"value",=,or,third,20,>=,and"#,
        )
        .unwrap();
        assert_eq!(
            filter.expression,
            "((first < $1) or (second = $2)) and (third >= $3)"
        );
        assert_eq!(
            filter.arguments,
            vec![
                Value::Integer(10),
                Value::Text("value".to_string()),
                Value::Integer(20),
            ]
        );
    }

    #[test]
    fn test_placeholders_follow_scan_order() {
        // four literals, reduced in a different nesting order than scanned
        let filter = compile(&[], r#"1,2,+,"a","b",=,and"#).unwrap();
        assert_eq!(filter.expression, "($1 + $2) and ($3 = $4)");
        assert_eq!(
            filter.arguments,
            vec![
                Value::Integer(1),
                Value::Integer(2),
                Value::Text("a".to_string()),
                Value::Text("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_field() {
        assert_eq!(
            compile(&[], r#"first,"value",="#),
            Err(CfqlError::UnknownField("first".to_string()))
        );
        // case-sensitive match
        assert_eq!(
            compile(&["name"], "Name,1,="),
            Err(CfqlError::UnknownField("Name".to_string()))
        );
    }

    #[test]
    fn test_insufficient_operands() {
        assert_eq!(
            compile(&["id"], "id,="),
            Err(CfqlError::InsufficientOperands("=".to_string()))
        );
        assert_eq!(
            compile(&[], "and"),
            Err(CfqlError::InsufficientOperands("and".to_string()))
        );
    }

    #[test]
    fn test_unbalanced_expression() {
        assert_eq!(
            compile(&["first", "second"], "first,second"),
            Err(CfqlError::UnbalancedExpression(2))
        );
        assert_eq!(
            compile(&["first"], "first,1,2"),
            Err(CfqlError::UnbalancedExpression(3))
        );
    }

    #[test]
    fn test_lexer_error_propagates() {
        assert_eq!(
            compile(&["first", "second"], "first second"),
            Err(CfqlError::UnexpectedCharacter(' '))
        );
        assert_eq!(
            compile(&["first"], r#"first,"oops"#),
            Err(CfqlError::UnterminatedString)
        );
    }

    #[test]
    fn test_deterministic() {
        let fields = ["first", "second", "third"];
        let input = r#"first,10,<,second,"value",=,or,third,20,>=,and"#;
        assert_eq!(
            compile(&fields, input).unwrap(),
            compile(&fields, input).unwrap()
        );
    }

    #[test]
    fn test_raw_filter_skips_validation() {
        let filter = Filter::raw("id = $1", vec![Value::Integer(7)]);
        assert_eq!(filter.expression, "id = $1");
        assert!(!filter.is_empty());
        assert!(Filter::default().is_empty());
    }
}
