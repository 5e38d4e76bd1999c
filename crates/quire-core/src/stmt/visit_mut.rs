#![allow(unused_variables)]

use super::*;

pub trait VisitMut: Sized {
    fn visit_expr_mut(&mut self, i: &mut Expr) {
        visit_expr_mut(self, i);
    }

    fn visit_expr_column_mut(&mut self, i: &mut ExprColumn) {}

    fn visit_select_mut(&mut self, i: &mut Select) {
        visit_select_mut(self, i);
    }

    fn visit_value_mut(&mut self, i: &mut Value) {}
}

impl<V: VisitMut> VisitMut for &mut V {
    fn visit_expr_mut(&mut self, i: &mut Expr) {
        VisitMut::visit_expr_mut(&mut **self, i);
    }

    fn visit_expr_column_mut(&mut self, i: &mut ExprColumn) {
        VisitMut::visit_expr_column_mut(&mut **self, i);
    }

    fn visit_select_mut(&mut self, i: &mut Select) {
        VisitMut::visit_select_mut(&mut **self, i);
    }

    fn visit_value_mut(&mut self, i: &mut Value) {
        VisitMut::visit_value_mut(&mut **self, i);
    }
}

pub fn visit_expr_mut<V>(v: &mut V, node: &mut Expr)
where
    V: VisitMut + ?Sized,
{
    match node {
        Expr::And(expr) => {
            for operand in &mut expr.operands {
                v.visit_expr_mut(operand);
            }
        }
        Expr::Array(expr) => {
            v.visit_expr_mut(&mut expr.lhs);
            for value in &mut expr.rhs {
                v.visit_value_mut(value);
            }
        }
        Expr::BinaryOp(expr) => {
            v.visit_expr_mut(&mut expr.lhs);
            v.visit_expr_mut(&mut expr.rhs);
        }
        Expr::Coalesce(expr) => {
            for operand in &mut expr.operands {
                v.visit_expr_mut(operand);
            }
        }
        Expr::Column(expr) => v.visit_expr_column_mut(expr),
        Expr::Exists(expr) => v.visit_select_mut(&mut expr.subquery),
        Expr::Func(expr) => {
            for arg in &mut expr.args {
                v.visit_expr_mut(arg);
            }
        }
        Expr::InList(expr) => {
            v.visit_expr_mut(&mut expr.expr);
            for item in &mut expr.list {
                v.visit_expr_mut(item);
            }
        }
        Expr::IsNull(expr) => v.visit_expr_mut(&mut expr.expr),
        Expr::Like(expr) => {
            v.visit_expr_mut(&mut expr.expr);
            v.visit_expr_mut(&mut expr.pattern);
        }
        Expr::Not(expr) => v.visit_expr_mut(&mut expr.expr),
        Expr::Or(expr) => {
            for operand in &mut expr.operands {
                v.visit_expr_mut(operand);
            }
        }
        Expr::Value(value) => v.visit_value_mut(value),
    }
}

pub fn visit_select_mut<V>(v: &mut V, node: &mut Select)
where
    V: VisitMut + ?Sized,
{
    if let Returning::Items(items) = &mut node.returning {
        for item in items {
            v.visit_expr_mut(&mut item.expr);
        }
    }

    for join in &mut node.source.joins {
        match &mut join.constraint {
            JoinOp::Left(expr) | JoinOp::Inner(expr) => v.visit_expr_mut(expr),
        }
    }

    if let Some(expr) = &mut node.filter.expr {
        v.visit_expr_mut(expr);
    }

    for order_by in &mut node.order_by {
        v.visit_expr_mut(&mut order_by.expr);
    }
}
