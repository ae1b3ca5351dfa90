use serde::{Deserialize, Serialize};

/// A length threshold that earns the organism a new species profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// `length_stat` value at which the milestone is reached
    pub length: u32,
    /// Label recorded in the evolution history once awarded
    pub name: String,
}

impl Milestone {
    pub fn new(length: u32, name: impl Into<String>) -> Self {
        Self {
            length,
            name: name.into(),
        }
    }
}

/// The stock evolution ladder, shortest first
pub fn default_milestones() -> Vec<Milestone> {
    vec![
        Milestone::new(20, "Common Grass Snake"),
        Milestone::new(50, "Emerald Tree Boa"),
        Milestone::new(100, "King Cobra"),
        Milestone::new(200, "Giant Reticulated Python"),
        Milestone::new(400, "Mythical World Serpent"),
    ]
}

/// First milestone that has been reached but not yet awarded.
///
/// Reached means `length_stat >= threshold`, so a growth spurt that jumps
/// straight past a threshold still counts, and a label already in `history`
/// never fires twice.
pub fn next_milestone<'a>(
    milestones: &'a [Milestone],
    length_stat: u32,
    history: &[String],
) -> Option<&'a Milestone> {
    milestones
        .iter()
        .take_while(|m| length_stat >= m.length)
        .find(|m| !history.iter().any(|awarded| awarded == &m.name))
}

/// Check that thresholds are strictly ascending
pub fn is_ascending(milestones: &[Milestone]) -> bool {
    milestones.windows(2).all(|pair| pair[0].length < pair[1].length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_below_first_threshold() {
        let table = default_milestones();
        assert_eq!(next_milestone(&table, 19, &[]), None);
    }

    #[test]
    fn test_fires_at_and_past_threshold() {
        let table = default_milestones();
        assert_eq!(next_milestone(&table, 20, &[]).unwrap().length, 20);
        // Jumping past the window still fires
        assert_eq!(next_milestone(&table, 23, &[]).unwrap().length, 20);
    }

    #[test]
    fn test_awarded_milestone_not_repeated() {
        let table = default_milestones();
        let history = vec!["Common Grass Snake".to_string()];
        assert_eq!(next_milestone(&table, 21, &history), None);
        assert_eq!(next_milestone(&table, 50, &history).unwrap().length, 50);
    }

    #[test]
    fn test_oldest_unawarded_first() {
        let table = default_milestones();
        let milestone = next_milestone(&table, 120, &[]).unwrap();
        assert_eq!(milestone.name, "Common Grass Snake");
    }

    #[test]
    fn test_default_table_ascending() {
        assert!(is_ascending(&default_milestones()));
        assert!(!is_ascending(&[
            Milestone::new(50, "b"),
            Milestone::new(20, "a"),
        ]));
    }
}
