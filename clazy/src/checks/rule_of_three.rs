//! Finds records with a user-written copy operation but compiler-generated peers.
//!
//! A class that needs a hand-written copy constructor or copy assignment
//! almost always owns a resource, and then needs all three of copy
//! constructor, copy assignment and destructor.

use crate::ast::{MethodDecl, MethodRole, NodeId, NodeKind};
use crate::checks::ids::CHECK_RULE_OF_THREE;
use crate::checks::{Check, CheckContext, CheckError};
use crate::constants::RULE_OF_THREE_BLACKLIST;
use crate::registry::{CheckDescriptor, CheckLevel, Interest};

/// Registration entry.
pub const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
    name: CHECK_RULE_OF_THREE,
    level: CheckLevel::Level1,
    interest: Interest::Decls,
    description: "Finds classes implementing only part of the rule of three",
    factory: create,
    fixits: &[],
};

fn create() -> Box<dyn Check> {
    Box::new(RuleOfThree)
}

/// Returns `true` for records whose partial copy semantics are intended.
fn is_blacklisted(name: &str) -> bool {
    name.starts_with("std::") || RULE_OF_THREE_BLACKLIST().contains(name)
}

#[derive(Default)]
struct SpecialMembers {
    copy_ctor: bool,
    copy_assign: bool,
    dtor: bool,
    deleted_copy: bool,
}

impl SpecialMembers {
    fn record(&mut self, method: &MethodDecl) {
        let user_provided = !method.is_implicit && !method.is_defaulted && !method.is_deleted;
        match method.role {
            MethodRole::CopyConstructor => {
                self.deleted_copy |= method.is_deleted;
                self.copy_ctor |= user_provided;
            }
            MethodRole::CopyAssignment => {
                self.deleted_copy |= method.is_deleted;
                self.copy_assign |= user_provided;
            }
            MethodRole::Destructor => self.dtor |= user_provided,
            _ => {}
        }
    }
}

/// The `rule-of-three` check.
#[derive(Debug, Default)]
pub struct RuleOfThree;

impl Check for RuleOfThree {
    fn name(&self) -> &'static str {
        CHECK_RULE_OF_THREE
    }

    fn visit_decl(&mut self, decl: NodeId, cx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let unit = cx.unit;
        let Some(NodeKind::Record { name, .. }) = unit.kind(decl) else {
            return Ok(());
        };
        if is_blacklisted(name) {
            return Ok(());
        }

        let mut members = SpecialMembers::default();
        for &child in unit.children(decl) {
            if let Some(NodeKind::Method(method)) = unit.kind(child) {
                members.record(method);
            }
        }
        // Non-copyable: nothing is generated behind the user's back
        if members.deleted_copy || !(members.copy_ctor || members.copy_assign) {
            return Ok(());
        }

        let parts = [
            (members.dtor, "dtor"),
            (members.copy_ctor, "copy-ctor"),
            (members.copy_assign, "copy-assignment operator"),
        ];
        let missing: Vec<&str> = parts.iter().filter(|p| !p.0).map(|p| p.1).collect();
        if missing.is_empty() {
            return Ok(());
        }
        let present: Vec<&str> = parts.iter().filter(|p| p.0).map(|p| p.1).collect();

        cx.emit_warning(
            unit.range(decl).begin,
            format!(
                "{name} has {} but not {}",
                present.join(", "),
                missing.join(", ")
            ),
            Vec::new(),
        );
        Ok(())
    }
}
