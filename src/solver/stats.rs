use std::fmt::{self, Debug, Display, Formatter};

use prettytable::format::consts::FORMAT_CLEAN;
use prettytable::{Cell, Row, Table};
use separator::Separatable;

/// Counters indexed by depth (number of moves from the initial state).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Stats {
    created_states: Vec<usize>,
    expanded_states: Vec<usize>,
    duplicate_states: Vec<usize>,
    expanded: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_created(&self) -> usize {
        self.created_states.iter().sum()
    }

    pub fn total_expanded(&self) -> u64 {
        self.expanded
    }

    pub fn total_duplicates(&self) -> usize {
        self.duplicate_states.iter().sum()
    }

    pub fn max_depth(&self) -> usize {
        self.created_states.len().saturating_sub(1)
    }

    pub(crate) fn add_created(&mut self, depth: usize) -> bool {
        Self::add(&mut self.created_states, depth)
    }

    pub(crate) fn add_expanded(&mut self, depth: usize) -> bool {
        self.expanded += 1;
        Self::add(&mut self.expanded_states, depth)
    }

    /// Successors thrown away because the state was already seen at the same or lower depth.
    pub(crate) fn add_duplicate(&mut self, depth: usize) -> bool {
        Self::add(&mut self.duplicate_states, depth)
    }

    fn add(counts: &mut Vec<usize>, depth: usize) -> bool {
        let mut ret = false;

        // while because some depths might be skipped
        while depth >= counts.len() {
            counts.push(0);
            ret = true;
        }
        counts[depth] += 1;
        ret
    }

    fn at(counts: &[usize], depth: usize) -> usize {
        counts.get(depth).cloned().unwrap_or(0)
    }
}

impl Debug for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "created by depth: {:?}", self.created_states)?;
        writeln!(f, "expanded by depth: {:?}", self.expanded_states)?;
        writeln!(f, "duplicates by depth: {:?}", self.duplicate_states)?;
        writeln!(f, "total created: {}", self.total_created().separated_string())?;
        writeln!(f, "total expanded: {}", self.total_expanded().separated_string())?;
        writeln!(
            f,
            "total duplicates: {}",
            self.total_duplicates().separated_string()
        )
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "States created total: {}",
            self.total_created().separated_string()
        )?;
        writeln!(
            f,
            "States expanded total: {}",
            self.total_expanded().separated_string()
        )?;
        writeln!(
            f,
            "Duplicates total: {}",
            self.total_duplicates().separated_string()
        )?;
        writeln!(f, "Max depth: {}", self.max_depth())?;
        writeln!(f)?;

        let mut table = Table::new();
        table.set_format(*FORMAT_CLEAN);
        table.set_titles(Row::new(vec![
            Cell::new("Depth"),
            Cell::new("Created"),
            Cell::new("Expanded"),
            Cell::new("Duplicates"),
        ]));
        // created_states is the longest vec because every state is created before it's expanded
        for depth in 0..self.created_states.len() {
            table.add_row(Row::new(vec![
                Cell::new(&format!("{}:", depth)),
                Cell::new(&Self::at(&self.created_states, depth).separated_string()),
                Cell::new(&Self::at(&self.expanded_states, depth).separated_string()),
                Cell::new(&Self::at(&self.duplicate_states, depth).separated_string()),
            ]));
        }
        write!(f, "{}", table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_by_depth() {
        let mut stats = Stats::new();
        assert!(stats.add_created(0));
        assert!(stats.add_created(2));
        assert!(!stats.add_created(2));
        assert!(stats.add_expanded(0));
        stats.add_duplicate(1);

        assert_eq!(stats.total_created(), 3);
        assert_eq!(stats.total_expanded(), 1);
        assert_eq!(stats.total_duplicates(), 1);
        assert_eq!(stats.max_depth(), 2);

        let text = stats.to_string();
        assert!(text.contains("States created total: 3"));
        assert!(text.contains("Max depth: 2"));
        assert!(text.contains("Depth"));
    }
}
