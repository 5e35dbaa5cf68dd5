use crate::data::SearchType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
    PendingChecks(SearchType),
    AverageTurnaround,
    TurnaroundTrend,
    Disputes,
    StatusDistribution,
    CompletionRates,
    VolumeTrend,
    Discrepancies,
    Regional,
    Suggestions,
}

impl QueryIntent {
    pub fn name(self) -> &'static str {
        match self {
            Self::PendingChecks(_) => "pending_checks",
            Self::AverageTurnaround => "average_turnaround",
            Self::TurnaroundTrend => "turnaround_trend",
            Self::Disputes => "disputes",
            Self::StatusDistribution => "status_distribution",
            Self::CompletionRates => "completion_rates",
            Self::VolumeTrend => "volume_trend",
            Self::Discrepancies => "discrepancies",
            Self::Regional => "regional",
            Self::Suggestions => "suggestions",
        }
    }
}

pub struct IntentRule {
    pub matches: fn(&str) -> bool,
    pub intent: QueryIntent,
}

/// Evaluated top to bottom against the lower-cased query; first hit wins.
pub const RULES: &[IntentRule] = &[
    IntentRule {
        matches: |q| q.contains("pending") && (q.contains("crim") || q.contains("criminal")),
        intent: QueryIntent::PendingChecks(SearchType::Crim),
    },
    IntentRule {
        matches: |q| q.contains("pending") && q.contains("edu"),
        intent: QueryIntent::PendingChecks(SearchType::Edu),
    },
    IntentRule {
        matches: |q| q.contains("pending") && q.contains("emp"),
        intent: QueryIntent::PendingChecks(SearchType::Emp),
    },
    IntentRule {
        matches: |q| q.contains("average") && q.contains("tat"),
        intent: QueryIntent::AverageTurnaround,
    },
    IntentRule {
        matches: |q| q.contains("turnaround") || q.contains("tat"),
        intent: QueryIntent::TurnaroundTrend,
    },
    IntentRule {
        matches: |q| q.contains("dispute"),
        intent: QueryIntent::Disputes,
    },
    IntentRule {
        matches: |q| q.contains("status") && (q.contains("distribution") || q.contains("breakdown")),
        intent: QueryIntent::StatusDistribution,
    },
    IntentRule {
        matches: |q| q.contains("completion") && q.contains("rate"),
        intent: QueryIntent::CompletionRates,
    },
    IntentRule {
        matches: |q| q.contains("volume") || q.contains("trend"),
        intent: QueryIntent::VolumeTrend,
    },
    IntentRule {
        matches: |q| q.contains("discrepan"),
        intent: QueryIntent::Discrepancies,
    },
    IntentRule {
        matches: |q| q.contains("region"),
        intent: QueryIntent::Regional,
    },
];

pub fn intent_from_text(text: &str) -> QueryIntent {
    let lowered = text.to_lowercase();
    RULES
        .iter()
        .find(|rule| (rule.matches)(&lowered))
        .map(|rule| rule.intent)
        .unwrap_or(QueryIntent::Suggestions)
}

/// Search type named in free text, checked in a fixed order.
pub fn search_type_mentioned(lowered: &str) -> Option<SearchType> {
    [
        ("edu", SearchType::Edu),
        ("crim", SearchType::Crim),
        ("emp", SearchType::Emp),
        ("mvr", SearchType::Mvr),
        ("dhs", SearchType::Dhs),
    ]
    .into_iter()
    .find(|(keyword, _)| lowered.contains(keyword))
    .map(|(_, search_type)| search_type)
}
