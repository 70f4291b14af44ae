//! Action type shorthands accepted by console commands.

use fieldops_types::{ActionId, ActionKind};

/// Map a typed action category to its kind.
///
/// Accepts `contract(s)`, `op(s)`/`operation(s)`, `blackop(s)`/
/// `black operation(s)` and `general`/`gen`/`general action(s)`, in any
/// case.
pub fn resolve_kind(kind: &str) -> Option<ActionKind> {
    let lowered = kind.trim().to_lowercase();
    match lowered.as_str() {
        "contract" | "contracts" => Some(ActionKind::Contract),
        "op" | "ops" | "operation" | "operations" => Some(ActionKind::Operation),
        "blackop" | "blackops" | "black operation" | "black operations" | "black op"
        | "black ops" => Some(ActionKind::BlackOp),
        "general" | "gen" | "general action" | "general actions" => Some(ActionKind::General),
        _ => None,
    }
}

/// Resolve a typed category and name into an action id.
///
/// The name matches case- and whitespace-insensitively.
pub fn resolve_action(kind: &str, name: &str) -> Option<ActionId> {
    ActionId::from_kind_and_name(resolve_kind(kind)?, name)
}
