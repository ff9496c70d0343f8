use crate::registry::IndentRole;

/// Block depth tracking while printing one instruction per line.
#[derive(Debug, Default)]
pub(super) struct Indenter {
    level: usize,
}

impl Indenter {
    /// Adjusts the depth for the line about to be printed and returns it.
    pub(super) fn before(&mut self, role: IndentRole) -> usize {
        match role {
            IndentRole::End => self.level = self.level.saturating_sub(1),
            IndentRole::ScopeEnd => self.level = 0,
            IndentRole::Cell | IndentRole::CellEnd => self.level = 1,
            _ => {}
        }

        self.level
    }

    /// Adjusts the depth for the following lines. `true` asks for a blank separator line.
    pub(super) fn after(&mut self, role: IndentRole) -> bool {
        match role {
            IndentRole::Begin => self.level += 1,
            IndentRole::ScopeBegin => self.level = 1,
            IndentRole::Cell => self.level = 2,
            IndentRole::CellEnd => self.level = 1,
            IndentRole::ScopeEnd => return true,
            _ => {}
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(roles: &[IndentRole]) -> (Vec<usize>, Vec<usize>, Vec<bool>) {
        let mut indenter = Indenter::default();

        let mut printed = Vec::new();
        let mut levels = Vec::new();
        let mut blanks = Vec::new();

        for role in roles {
            printed.push(indenter.before(*role));
            blanks.push(indenter.after(*role));
            levels.push(indenter.level);
        }

        (printed, levels, blanks)
    }

    #[test]
    fn test_scope_nesting() {
        use IndentRole::*;

        let (printed, levels, blanks) = run(&[ScopeBegin, Begin, End, ScopeEnd]);

        assert_eq!(levels, [1, 2, 1, 0]);
        assert_eq!(printed, [0, 1, 1, 0]);
        assert_eq!(blanks, [false, false, false, true]);
    }

    #[test]
    fn test_cells() {
        use IndentRole::*;

        let (printed, levels, _) = run(&[ScopeBegin, Cell, None, CellEnd, Begin, Cell, ScopeEnd]);

        assert_eq!(printed, [0, 1, 2, 1, 1, 1, 0]);
        assert_eq!(levels, [1, 2, 2, 1, 2, 2, 0]);
    }

    #[test]
    fn test_unbalanced_end() {
        use IndentRole::*;

        let (printed, levels, _) = run(&[End, End, Begin]);

        assert_eq!(printed, [0, 0, 0]);
        assert_eq!(levels, [0, 0, 1]);
    }
}
