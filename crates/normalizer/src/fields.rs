//! Candidate-path tables for every logical field the engine reads.
//!
//! Order within each table is part of the contract: producers may populate
//! only one spelling, and the first present candidate wins.

use crate::paths::FieldSpec;

pub const DECISION_STATUS: FieldSpec = FieldSpec {
    name: "decision_status",
    candidates: &[
        "view_model.decision_status",
        "view_model.decisionStatus",
        "decision_summary.decision_status",
        "decision_summary.status",
        "provenance.decision_reason_code",
        "decision_status",
        "decisionStatus",
    ],
};

pub const DECISION_REASON_CODE: FieldSpec = FieldSpec {
    name: "decision_reason_code",
    candidates: &[
        "view_model.decision_reason_code",
        "view_model.decisionReasonCode",
        "decision_summary.decision_reason_code",
        "decision_summary.reason_code",
        "provenance.decision_reason_code",
    ],
};

pub const DECISION_REASON_TEXT: FieldSpec = FieldSpec {
    name: "decision_reason_text",
    candidates: &[
        "view_model.decision_reason",
        "view_model.decisionReason",
        "decision_summary.decision_reason",
        "decision_summary.reason",
    ],
};

pub const STATUS_PROVENANCE: FieldSpec = FieldSpec {
    name: "decision_status_provenance",
    candidates: &[
        "view_model.decision_status_provenance",
        "view_model.decisionStatusProvenance",
        "decision_summary.provenance",
    ],
};

pub const PROFILE_ID: FieldSpec = FieldSpec {
    name: "profile_id",
    candidates: &[
        "view_model.profile_id",
        "profile_id",
        "view_model.profileId",
        "profileId",
        "view_model.tile_profile_id",
        "view_model.content_profile_id",
        "view_model.scope_items_profile_id",
    ],
};

pub const TILE_PROFILE_ID: FieldSpec = FieldSpec {
    name: "tile_profile_id",
    candidates: &["view_model.tile_profile_id", "view_model.tileProfileId", "tile_profile_id"],
};

pub const CONTENT_PROFILE_ID: FieldSpec = FieldSpec {
    name: "content_profile_id",
    candidates: &[
        "view_model.content_profile_id",
        "view_model.contentProfileId",
        "content_profile_id",
    ],
};

pub const SCOPE_ITEMS_PROFILE_ID: FieldSpec = FieldSpec {
    name: "scope_items_profile_id",
    candidates: &[
        "view_model.scope_items_profile_id",
        "view_model.scopeItemsProfileId",
        "scope_items_profile_id",
    ],
};

pub const COLUMNS: FieldSpec = FieldSpec {
    name: "columns",
    candidates: &["view_model.columns", "columns"],
};

pub const ROWS: FieldSpec = FieldSpec {
    name: "rows",
    candidates: &["view_model.rows", "view_model.scenarios", "rows"],
};

pub const CONTENT: FieldSpec = FieldSpec {
    name: "content",
    candidates: &["view_model.content", "content"],
};

pub const PRIMARY_CONTROL_VARIABLE: FieldSpec = FieldSpec {
    name: "primary_control_variable",
    candidates: &[
        "view_model.primary_control_variable",
        "view_model.primaryControlVariable",
        "view_model.decision_insurance.primary_control_variable",
    ],
};

pub const FIRST_BREAK_CONDITION: FieldSpec = FieldSpec {
    name: "first_break_condition",
    candidates: &[
        "view_model.first_break_condition",
        "view_model.firstBreakCondition",
        "view_model.decision_insurance.first_break_condition",
    ],
};

pub const FLEX_BEFORE_BREAK_PCT: FieldSpec = FieldSpec {
    name: "flex_before_break_pct",
    candidates: &[
        "view_model.flex_before_break_pct",
        "view_model.flexBeforeBreakPct",
        "view_model.decision_insurance.flex_before_break_pct",
    ],
};

pub const EXPOSURE_CONCENTRATION_PCT: FieldSpec = FieldSpec {
    name: "exposure_concentration_pct",
    candidates: &[
        "view_model.exposure_concentration_pct",
        "view_model.exposureConcentrationPct",
        "view_model.decision_insurance.exposure_concentration_pct",
    ],
};

pub const RANKED_LIKELY_WRONG: FieldSpec = FieldSpec {
    name: "ranked_likely_wrong",
    candidates: &[
        "view_model.ranked_likely_wrong",
        "view_model.rankedLikelyWrong",
        "view_model.decision_insurance.ranked_likely_wrong",
    ],
};

pub const DECISION_INSURANCE_PROVENANCE: FieldSpec = FieldSpec {
    name: "decision_insurance_provenance",
    candidates: &[
        "view_model.decision_insurance_provenance",
        "view_model.decisionInsuranceProvenance",
        "view_model.provenance.decision_insurance",
        "provenance.decision_insurance",
    ],
};

pub const PROVENANCE: FieldSpec = FieldSpec {
    name: "provenance",
    candidates: &["view_model.provenance", "provenance"],
};

pub const CONTROLS: FieldSpec = FieldSpec {
    name: "controls",
    candidates: &[
        "view_model.controls",
        "view_model.provenance.dealshield_controls",
        "provenance.dealshield_controls",
        "controls",
    ],
};

// --- Summary numbers ---

pub const STABILIZED_VALUE: FieldSpec = FieldSpec {
    name: "stabilized_value",
    candidates: &[
        "view_model.decision_summary.stabilized_value",
        "view_model.stabilized_value",
        "view_model.stabilizedValue",
        "decision_summary.stabilized_value",
    ],
};

pub const TOTAL_COST: FieldSpec = FieldSpec {
    name: "total_cost",
    candidates: &[
        "view_model.decision_summary.total_cost",
        "view_model.total_project_cost",
        "view_model.total_cost",
        "view_model.totalCost",
        "decision_summary.total_cost",
        "totals.total_project_cost",
    ],
};

pub const VALUE_GAP: FieldSpec = FieldSpec {
    name: "value_gap",
    candidates: &[
        "view_model.decision_summary.value_gap",
        "view_model.value_gap",
        "view_model.valueGap",
        "decision_summary.value_gap",
    ],
};

pub const YIELD_ON_COST: FieldSpec = FieldSpec {
    name: "yield_on_cost",
    candidates: &[
        "view_model.decision_summary.yield_on_cost",
        "view_model.yield_on_cost",
        "view_model.yieldOnCost",
        "decision_summary.yield_on_cost",
        "ownership_analysis.yield_on_cost",
    ],
};

pub const MARKET_CAP_RATE: FieldSpec = FieldSpec {
    name: "market_cap_rate",
    candidates: &[
        "view_model.decision_summary.market_cap_rate",
        "view_model.market_cap_rate",
        "view_model.marketCapRate",
        "view_model.cap_rate",
        "decision_summary.market_cap_rate",
    ],
};

pub const YIELD_CAP_SPREAD_BPS: FieldSpec = FieldSpec {
    name: "yield_cap_spread_bps",
    candidates: &[
        "view_model.decision_summary.yield_cap_spread_bps",
        "view_model.yield_cap_spread_bps",
        "view_model.yieldCapSpreadBps",
        "view_model.spread_bps",
        "decision_summary.yield_cap_spread_bps",
    ],
};

pub const DSCR: FieldSpec = FieldSpec {
    name: "dscr",
    candidates: &[
        "view_model.decision_summary.dscr",
        "view_model.dscr",
        "decision_summary.dscr",
        "debt_metrics.calculated_dscr",
    ],
};

pub const DSCR_TARGET: FieldSpec = FieldSpec {
    name: "dscr_target",
    candidates: &[
        "view_model.decision_summary.dscr_target",
        "view_model.dscr_target",
        "view_model.target_dscr",
        "view_model.dscrTarget",
        "decision_summary.dscr_target",
        "debt_metrics.target_dscr",
    ],
};

pub const TARGET_YIELD: FieldSpec = FieldSpec {
    name: "target_yield",
    candidates: &[
        "view_model.decision_summary.target_yield",
        "view_model.target_yield",
        "view_model.targetYield",
        "decision_summary.target_yield",
        "return_metrics.target_yield",
    ],
};

pub const NOI: FieldSpec = FieldSpec {
    name: "noi",
    candidates: &[
        "view_model.decision_summary.noi",
        "view_model.noi",
        "view_model.net_operating_income",
        "decision_summary.noi",
        "return_metrics.stabilized_noi",
    ],
};
