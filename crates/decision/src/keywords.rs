use core_types::DecisionStatus;

/// Normalizes a loosely spelled upstream status by keyword containment.
///
/// The checks run in a fixed order so that `no-go` is never mistaken for `go`
/// and `near go` lands on `NEEDS_WORK`. Returns `None` when no keyword matches.
pub fn normalize_status(raw: &str) -> Option<DecisionStatus> {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }

    if ["no-go", "no_go", "no go"].iter().any(|k| lowered.contains(k)) {
        Some(DecisionStatus::NoGo)
    } else if lowered.contains("work") || lowered.contains("near") {
        Some(DecisionStatus::NeedsWork)
    } else if lowered.contains("go") {
        Some(DecisionStatus::Go)
    } else if lowered.contains("pending") || lowered.contains("review") {
        Some(DecisionStatus::Pending)
    } else {
        None
    }
}
