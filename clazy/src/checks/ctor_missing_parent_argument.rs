//! Finds `QObject` subclasses whose constructors cannot be given a parent.

use crate::ast::{MethodRole, NodeId, NodeKind, Param};
use crate::checks::ids::CHECK_CTOR_MISSING_PARENT_ARGUMENT;
use crate::checks::{Check, CheckContext, CheckError};
use crate::registry::{CheckDescriptor, CheckLevel, Interest};

/// Registration entry.
pub const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
    name: CHECK_CTOR_MISSING_PARENT_ARGUMENT,
    level: CheckLevel::Level2,
    interest: Interest::Decls,
    description: "Finds QObject subclasses without a parent argument in their constructors",
    factory: create,
    fixits: &[],
};

fn create() -> Box<dyn Check> {
    Box::new(CtorMissingParentArgument)
}

/// The parent type a constructor of a class with these bases should accept.
fn expected_parent_type(bases: &[String]) -> &'static str {
    let inherits = |name: &str| bases.iter().any(|b| b == name);
    if inherits("QQuickItem") {
        "QQuickItem"
    } else if inherits("QWidget") {
        "QWidget"
    } else {
        "QObject"
    }
}

/// `QObject *parent`, `QObject* parent = nullptr`, ... all spell `QObject *`.
fn is_pointer_to(param: &Param, type_name: &str) -> bool {
    let spelled: String = param
        .type_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let spelled = spelled.strip_prefix("const").unwrap_or(&spelled);
    spelled.strip_suffix('*') == Some(type_name)
}

/// The `ctor-missing-parent-argument` check.
#[derive(Debug, Default)]
pub struct CtorMissingParentArgument;

impl Check for CtorMissingParentArgument {
    fn name(&self) -> &'static str {
        CHECK_CTOR_MISSING_PARENT_ARGUMENT
    }

    fn visit_decl(&mut self, decl: NodeId, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let unit = cx.unit;
        let Some(NodeKind::Record { name, bases }) = unit.kind(decl) else {
            return Ok(());
        };
        let is_qobject = name == "QObject" || bases.iter().any(|b| b == "QObject");
        if !is_qobject || bases.iter().any(|b| b == "QCoreApplication") {
            return Ok(());
        }

        let parent_type = expected_parent_type(bases);
        let mut constructors = 0usize;
        let mut takes_parent = false;
        for &child in unit.children(decl) {
            let Some(NodeKind::Method(method)) = unit.kind(child) else {
                continue;
            };
            if method.role != MethodRole::Constructor
                || !method.is_user_declared()
                || method.is_deleted
            {
                continue;
            }
            constructors += 1;
            takes_parent |= method.params.iter().any(|p| is_pointer_to(p, parent_type));
        }

        if constructors > 0 && !takes_parent {
            cx.emit_warning(
                unit.range(decl).begin,
                format!("{name} should take {parent_type} parent argument in CTOR"),
                Vec::new(),
            );
        }
        Ok(())
    }
}
