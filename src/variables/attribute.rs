//! Best-effort resolution of a block attribute to a concrete value.
//!
//! Declaration files are parsed, never executed, so there is no evaluation
//! context to bind variables, locals or functions against. An attribute such as
//! `default = 5` evaluates fine against an empty context, but `type = string`
//! or `default = local.region` would always fail. Those are common enough in
//! real modules that failing on them would hide most type information, so a
//! reference to a single identifier is reported as a [`AttributeValue::SymbolicReference`]
//! carrying the identifier's name instead of being evaluated.

use hcl::eval::{Context, Evaluate};
use hcl::expr::{Expression, ObjectKey, Operation, TraversalOperator};
use hcl::template::{Directive, Element, Template};
use hcl::{Block, Value};

/// Outcome of resolving one attribute expression.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// The expression evaluated to a value without any bindings.
    Literal(Value),
    /// The expression references exactly one identifier, reported by name.
    SymbolicReference(String),
    /// The expression needs bindings that do not exist here.
    Unresolvable(String),
}

impl AttributeValue {
    /// The concrete value, with a symbolic reference standing in as its name.
    ///
    /// Returns `None` for [`AttributeValue::Unresolvable`].
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Literal(value) => Some(value),
            Self::SymbolicReference(name) => Some(Value::String(name)),
            Self::Unresolvable(_) => None,
        }
    }
}

/// Resolve the attribute `name` of `block`.
///
/// Returns `None` when the block has no such attribute. Pure function of its
/// inputs.
///
/// # Examples
///
/// ```rust
/// use tgscaffold_cli::variables::attribute::{resolve_attribute, AttributeValue};
///
/// let body = hcl::parse(r#"variable "size" {
///   type    = number
///   default = 3
/// }"#).unwrap();
/// let block = body.blocks().next().unwrap();
///
/// assert_eq!(
///     resolve_attribute(block, "type"),
///     Some(AttributeValue::SymbolicReference("number".to_string()))
/// );
/// assert_eq!(
///     resolve_attribute(block, "default"),
///     Some(AttributeValue::Literal(hcl::Value::from(3)))
/// );
/// assert_eq!(resolve_attribute(block, "description"), None);
/// ```
#[must_use]
pub fn resolve_attribute(block: &Block, name: &str) -> Option<AttributeValue> {
    let attribute = block.body().attributes().find(|attr| attr.key() == name)?;
    Some(resolve_expression(attribute.expr()))
}

/// Resolve a single expression, see [`resolve_attribute`].
#[must_use]
pub fn resolve_expression(expr: &Expression) -> AttributeValue {
    let references = referenced_roots(expr);
    if let [single] = references.as_slice() {
        return AttributeValue::SymbolicReference(single.clone());
    }

    match expr.evaluate(&Context::new()) {
        Ok(value) => AttributeValue::Literal(value),
        Err(errors) => AttributeValue::Unresolvable(errors.to_string()),
    }
}

/// Distinct root identifiers referenced by `expr`, in encounter order.
///
/// `var.region` contributes `var`, `list(string)` contributes `string`. Names
/// bound by a `for` expression are not references.
fn referenced_roots(expr: &Expression) -> Vec<String> {
    let mut roots = Vec::new();
    collect_roots(expr, &[], &mut roots);
    roots
}

fn collect_roots(expr: &Expression, bound: &[String], roots: &mut Vec<String>) {
    match expr {
        Expression::Variable(variable) => push_root(variable.as_str(), bound, roots),
        Expression::Traversal(traversal) => {
            collect_roots(&traversal.expr, bound, roots);
            for operator in &traversal.operators {
                if let TraversalOperator::Index(index) = operator {
                    collect_roots(index, bound, roots);
                }
            }
        }
        Expression::Array(items) => {
            for item in items {
                collect_roots(item, bound, roots);
            }
        }
        Expression::Object(object) => {
            for (key, value) in object {
                if let ObjectKey::Expression(key_expr) = key {
                    collect_roots(key_expr, bound, roots);
                }
                collect_roots(value, bound, roots);
            }
        }
        Expression::FuncCall(call) => {
            for arg in &call.args {
                collect_roots(arg, bound, roots);
            }
        }
        Expression::Parenthesis(inner) => collect_roots(inner, bound, roots),
        Expression::Conditional(cond) => {
            collect_roots(&cond.cond_expr, bound, roots);
            collect_roots(&cond.true_expr, bound, roots);
            collect_roots(&cond.false_expr, bound, roots);
        }
        Expression::Operation(operation) => match operation.as_ref() {
            Operation::Unary(unary) => collect_roots(&unary.expr, bound, roots),
            Operation::Binary(binary) => {
                collect_roots(&binary.lhs_expr, bound, roots);
                collect_roots(&binary.rhs_expr, bound, roots);
            }
        },
        Expression::ForExpr(for_expr) => {
            collect_roots(&for_expr.collection_expr, bound, roots);

            let mut inner_bound = bound.to_vec();
            inner_bound.push(for_expr.value_var.as_str().to_string());
            if let Some(key_var) = &for_expr.key_var {
                inner_bound.push(key_var.as_str().to_string());
            }

            if let Some(key_expr) = &for_expr.key_expr {
                collect_roots(key_expr, &inner_bound, roots);
            }
            collect_roots(&for_expr.value_expr, &inner_bound, roots);
            if let Some(cond_expr) = &for_expr.cond_expr {
                collect_roots(cond_expr, &inner_bound, roots);
            }
        }
        Expression::TemplateExpr(template_expr) => {
            // An unparsable template references nothing
            if let Ok(template) = Template::from_expr(template_expr) {
                collect_template_roots(&template, bound, roots);
            }
        }
        _ => {}
    }
}

fn collect_template_roots(template: &Template, bound: &[String], roots: &mut Vec<String>) {
    for element in template.elements() {
        match element {
            Element::Literal(_) => {}
            Element::Interpolation(interpolation) => collect_roots(&interpolation.expr, bound, roots),
            Element::Directive(Directive::If(if_directive)) => {
                collect_roots(&if_directive.cond_expr, bound, roots);
                collect_template_roots(&if_directive.true_template, bound, roots);
                if let Some(false_template) = &if_directive.false_template {
                    collect_template_roots(false_template, bound, roots);
                }
            }
            Element::Directive(Directive::For(for_directive)) => {
                collect_roots(&for_directive.collection_expr, bound, roots);

                let mut inner_bound = bound.to_vec();
                inner_bound.push(for_directive.value_var.as_str().to_string());
                if let Some(key_var) = &for_directive.key_var {
                    inner_bound.push(key_var.as_str().to_string());
                }
                collect_template_roots(&for_directive.template, &inner_bound, roots);
            }
        }
    }
}

fn push_root(name: &str, bound: &[String], roots: &mut Vec<String>) {
    if bound.iter().any(|b| b == name) {
        return;
    }
    if !roots.iter().any(|r| r == name) {
        roots.push(name.to_string());
    }
}
