mod direction;
pub use direction::Direction;

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_array;
pub use expr_array::{ArrayOp, ExprArray};

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_coalesce;
pub use expr_coalesce::ExprCoalesce;

mod expr_column;
pub use expr_column::{ExprColumn, TableRef};

mod expr_exists;
pub use expr_exists::ExprExists;

mod expr_func;
pub use expr_func::ExprFunc;

mod expr_in_list;
pub use expr_in_list::ExprInList;

mod expr_is_null;
pub use expr_is_null::ExprIsNull;

mod expr_like;
pub use expr_like::ExprLike;

mod expr_not;
pub use expr_not::ExprNot;

mod expr_or;
pub use expr_or::ExprOr;

mod filter;
pub use filter::Filter;

mod join;
pub use join::{Join, JoinOp};

mod limit;
pub use limit::Limit;

mod op_binary;
pub use op_binary::BinaryOp;

mod order_by_expr;
pub use order_by_expr::OrderByExpr;

mod returning;
pub use returning::{Returning, SelectItem};

mod select;
pub use select::Select;

mod table_with_joins;
pub use table_with_joins::{TableFactor, TableWithJoins};

mod value;
pub use value::Value;

pub mod visit_mut;
pub use visit_mut::VisitMut;

