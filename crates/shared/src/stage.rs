//! The six-stage problem-solving workflow.

/// One phase of the workflow. Declaration order is workflow order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Analysis,
    Goals,
    Planning,
    Research,
    Work,
    Solution,
}

/// (wire id, label, description) per stage, indexed by `Stage::index`.
const STAGE_TABLE: [(&str, &str, &str); 6] = [
    ("analysis", "Analysis", "Problem statement"),
    ("goals", "Goals", "Formulating goals"),
    ("planning", "Plan", "Planning the work"),
    ("research", "Research", "Researching materials"),
    ("work", "Work", "Carrying out tasks"),
    ("solution", "Solution", "Final answer"),
];

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Analysis,
        Stage::Goals,
        Stage::Planning,
        Stage::Research,
        Stage::Work,
        Stage::Solution,
    ];

    /// Position in the workflow, starting at 0
    pub fn index(self) -> usize {
        self as usize
    }

    /// Identifier sent to the remote service
    pub fn as_str(self) -> &'static str {
        STAGE_TABLE[self.index()].0
    }

    pub fn label(self) -> &'static str {
        STAGE_TABLE[self.index()].1
    }

    pub fn description(self) -> &'static str {
        STAGE_TABLE[self.index()].2
    }

    /// Whether `self` comes strictly before `current` in the workflow.
    pub fn is_before(self, current: Stage) -> bool {
        self.index() < current.index()
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::Analysis
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_index_order() {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
    }

    #[test]
    fn test_wire_ids() {
        let ids: Vec<&str> = Stage::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            ids,
            vec!["analysis", "goals", "planning", "research", "work", "solution"]
        );
    }

    #[test]
    fn test_is_before() {
        assert!(Stage::Analysis.is_before(Stage::Goals));
        assert!(!Stage::Goals.is_before(Stage::Goals));
        assert!(!Stage::Solution.is_before(Stage::Work));
    }

    #[test]
    fn test_default_is_analysis() {
        assert_eq!(Stage::default(), Stage::Analysis);
        assert_eq!(Stage::Planning.to_string(), "Plan");
    }
}
