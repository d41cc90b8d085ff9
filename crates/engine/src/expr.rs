use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::error::{EngineError, EngineResult};

/// Arithmetic expression over named variables, evaluated to `f64`.
/// Used by computed columns; variables are bound per row.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(f64),
    Variable(String),
    UnaryOp {
        op: UnaryOperator,
        expr: Box<Expr>,
    },
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
        };
        write!(f, "{}", symbol)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(number) => write!(f, "{}", number),
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::UnaryOp { op, expr } => match op {
                UnaryOperator::Minus => write!(f, "-{}", expr),
            },
            Expr::BinaryOp { left, op, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}

pub fn evaluate(expr: &Expr, bindings: &HashMap<String, f64>) -> EngineResult<f64> {
    match expr {
        Expr::Literal(number) => Ok(*number),
        Expr::Variable(name) => bindings
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::Expression(format!("unbound variable {}", name))),
        Expr::UnaryOp { op, expr } => {
            let value = evaluate(expr, bindings)?;
            match op {
                UnaryOperator::Minus => Ok(-value),
            }
        }
        Expr::BinaryOp { left, op, right } => {
            let left_value = evaluate(left, bindings)?;
            let right_value = evaluate(right, bindings)?;
            match op {
                BinaryOperator::Plus => Ok(left_value + right_value),
                BinaryOperator::Minus => Ok(left_value - right_value),
                BinaryOperator::Multiply => Ok(left_value * right_value),
                BinaryOperator::Divide => {
                    if right_value == 0.0 {
                        return Err(EngineError::Expression("division by zero".to_string()));
                    }
                    Ok(left_value / right_value)
                }
            }
        }
    }
}

/// Names of all variables the expression reads, sorted.
pub fn referenced_variables(expr: &Expr) -> BTreeSet<String> {
    let mut variables = BTreeSet::new();
    collect_variables(expr, &mut variables);
    variables
}

fn collect_variables(expr: &Expr, variables: &mut BTreeSet<String>) {
    match expr {
        Expr::Literal(_) => {}
        Expr::Variable(name) => {
            variables.insert(name.clone());
        }
        Expr::UnaryOp { expr, .. } => collect_variables(expr, variables),
        Expr::BinaryOp { left, right, .. } => {
            collect_variables(left, variables);
            collect_variables(right, variables);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(value: f64) -> Expr {
        Expr::Literal(value)
    }

    fn var(name: &str) -> Expr {
        Expr::Variable(name.to_string())
    }

    fn bin(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
        Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    fn bindings(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn evaluates_nested_arithmetic() {
        let expression = bin(
            bin(var("grade"), BinaryOperator::Plus, var("bonus")),
            BinaryOperator::Divide,
            lit(2.0),
        );
        let result = evaluate(&expression, &bindings(&[("grade", 1.7), ("bonus", 0.3)])).unwrap();
        assert_eq!(result, 1.0);
    }

    #[test]
    fn unary_minus_negates() {
        let expression = Expr::UnaryOp {
            op: UnaryOperator::Minus,
            expr: Box::new(var("grade")),
        };
        let result = evaluate(&expression, &bindings(&[("grade", 1.3)])).unwrap();
        assert_eq!(result, -1.3);
    }

    #[test]
    fn unbound_variable_fails() {
        let expression = bin(var("grade"), BinaryOperator::Plus, var("bonus"));
        let error = evaluate(&expression, &bindings(&[("grade", 1.7)])).unwrap_err();
        insta::assert_snapshot!(error.to_string(), @"expression error: unbound variable bonus");
    }

    #[test]
    fn division_by_zero_fails() {
        let expression = bin(lit(1.0), BinaryOperator::Divide, lit(0.0));
        let error = evaluate(&expression, &HashMap::new()).unwrap_err();
        insta::assert_snapshot!(error.to_string(), @"expression error: division by zero");
    }

    #[test]
    fn collects_referenced_variables_once() {
        let expression = bin(
            bin(var("grade"), BinaryOperator::Multiply, var("grade")),
            BinaryOperator::Minus,
            var("bonus"),
        );
        let variables = referenced_variables(&expression);
        assert_eq!(
            variables.into_iter().collect::<Vec<_>>(),
            vec!["bonus".to_string(), "grade".to_string()]
        );
    }

    #[test]
    fn renders_parenthesized_infix() {
        let expression = bin(
            bin(var("grade"), BinaryOperator::Plus, var("bonus")),
            BinaryOperator::Divide,
            lit(2.0),
        );
        insta::assert_snapshot!(expression.to_string(), @"((grade + bonus) / 2)");
    }
}
