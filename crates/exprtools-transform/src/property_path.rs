//! Member path extraction, `x => x.Data2.Data3` to `"Data2.Data3"`.

use exprtools_core::{Expr, LambdaExpr, PathError};

/// The dotted member path of a lambda whose body is a member-access chain
/// rooted at a parameter.
pub fn property_path(lambda: &LambdaExpr) -> Result<String, PathError> {
    let mut names = Vec::new();
    let mut current = &*lambda.body;
    loop {
        match current {
            Expr::Member(member) => {
                names.push(member.member.name.as_str());
                match member.target.as_deref() {
                    Some(target) => current = target,
                    None => break,
                }
            }
            Expr::Parameter(_) => break,
            Expr::Lambda(nested) => current = &nested.body,
            other => return Err(PathError::UnexpectedNode(other.kind_name())),
        }
    }
    if names.is_empty() {
        return Err(PathError::NoMember);
    }
    names.reverse();
    Ok(names.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use exprtools_core::{BinaryOp, DataType, MemberInfo, ParameterExpr, Value};

    fn data1() -> DataType {
        DataType::named("Sample.Data1")
    }

    fn chain() -> (ParameterExpr, Expr) {
        let data2 = DataType::named("Sample.Data2");
        let data3 = DataType::named("Sample.Data3");
        let d = ParameterExpr::new("d", data1());
        let expr = Expr::member(
            Some(Expr::member(
                Some(Expr::Parameter(d.clone())),
                MemberInfo::property("Data2", data1(), data2.clone()),
            )),
            MemberInfo::property("Data3", data2, data3),
        );
        (d, expr)
    }

    #[test]
    fn test_member_chain() {
        let (d, body) = chain();
        let lambda = LambdaExpr::new(vec![d], body);
        assert_eq!(property_path(&lambda).unwrap(), "Data2.Data3");
    }

    #[test]
    fn test_bare_parameter_has_no_path() {
        let d = ParameterExpr::new("d", data1());
        let lambda = LambdaExpr::new(vec![d.clone()], Expr::Parameter(d));
        assert_eq!(property_path(&lambda), Err(PathError::NoMember));
    }

    #[test]
    fn test_other_nodes_are_rejected() {
        let (d, body) = chain();
        let compare = Expr::binary(BinaryOp::NotEqual, body, Expr::null(DataType::named("Sample.Data3")));
        let lambda = LambdaExpr::new(vec![d.clone()], compare);
        assert_eq!(
            property_path(&lambda),
            Err(PathError::UnexpectedNode("binary operator"))
        );

        let lambda = LambdaExpr::new(vec![d], Expr::constant(Value::Int32(1), DataType::int32()));
        assert!(matches!(property_path(&lambda), Err(PathError::UnexpectedNode("constant"))));
    }
}
