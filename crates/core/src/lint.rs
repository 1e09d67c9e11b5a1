use indexmap::IndexMap;
use thiserror::Error;

use crate::ast::Op;
use crate::diag::{DiagnosticKind, Severity};

/// A control-flow or label finding, addressed by listing index (which
/// equals source line index).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFinding {
    pub line: usize,
    pub kind: LintKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LintKind {
    #[error("duplicate label: \"{0}\"")]
    DuplicateLabel(String),
    #[error("unused label: \"{0}\"")]
    UnusedLabel(String),
    #[error("missing label: \"{0}\"")]
    MissingLabel(String),
    #[error("unreachable code")]
    UnreachableCode,
    #[error("unconditional branch just before the target label")]
    RedundantBranch,
    #[error("infinite loop")]
    InfiniteLoop,
    #[error("#pragma version is only allowed before instructions")]
    PragmaAfterInstruction,
}

impl LintKind {
    pub fn severity(&self) -> Severity {
        match self {
            LintKind::DuplicateLabel(_)
            | LintKind::MissingLabel(_)
            | LintKind::InfiniteLoop
            | LintKind::PragmaAfterInstruction => Severity::Error,
            LintKind::UnusedLabel(_) | LintKind::UnreachableCode | LintKind::RedundantBranch => {
                Severity::Warning
            }
        }
    }

    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            LintKind::DuplicateLabel(_) => DiagnosticKind::DuplicateLabel,
            LintKind::UnusedLabel(_) => DiagnosticKind::UnusedLabel,
            LintKind::MissingLabel(_) => DiagnosticKind::MissingLabel,
            LintKind::UnreachableCode => DiagnosticKind::UnreachableCode,
            LintKind::RedundantBranch => DiagnosticKind::RedundantBranch,
            LintKind::InfiniteLoop => DiagnosticKind::InfiniteLoop,
            LintKind::PragmaAfterInstruction => DiagnosticKind::PragmaAfterInstruction,
        }
    }
}

/// Advisory edit that would remove a redundancy, keyed by line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedundantLine {
    pub line: usize,
    pub kind: Redundancy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redundancy {
    RemoveLabel(String),
    RemoveBranch,
}

impl std::fmt::Display for Redundancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Redundancy::RemoveLabel(name) => write!(f, "Remove label '{name}'"),
            Redundancy::RemoveBranch => write!(f, "Remove b call"),
        }
    }
}

/// Index-based control-flow analysis over a finished listing. No CFG is
/// built; every check walks listing indices directly.
pub struct Linter<'a> {
    listing: &'a [Op],
    findings: Vec<LintFinding>,
    redundants: Vec<RedundantLine>,
}

impl<'a> Linter<'a> {
    pub fn new(listing: &'a [Op]) -> Self {
        Self {
            listing,
            findings: Vec::new(),
            redundants: Vec::new(),
        }
    }

    pub fn lint(mut self) -> (Vec<LintFinding>, Vec<RedundantLine>) {
        self.check_duplicate_labels();
        self.check_unused_labels();
        self.check_unreachable_code();
        self.check_branch_just_before_label();
        self.check_loops();
        self.check_pragma_position();
        (self.findings, self.redundants)
    }

    /// Label name -> definition indices, in definition order.
    fn label_defs(&self) -> IndexMap<&'a str, Vec<usize>> {
        let mut defs: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for (i, op) in self.listing.iter().enumerate() {
            if let Op::Label { name } = op {
                defs.entry(name.as_str()).or_default().push(i);
            }
        }
        defs
    }

    /// Label name -> referencing indices, in reference order.
    fn label_users(&self) -> IndexMap<&'a str, Vec<usize>> {
        let mut users: IndexMap<&str, Vec<usize>> = IndexMap::new();
        for (i, op) in self.listing.iter().enumerate() {
            for target in op.label_refs() {
                users.entry(target.as_str()).or_default().push(i);
            }
        }
        users
    }

    fn check_duplicate_labels(&mut self) {
        for (name, lines) in self.label_defs() {
            if lines.len() > 1 {
                for line in lines {
                    self.findings.push(LintFinding {
                        line,
                        kind: LintKind::DuplicateLabel(name.to_string()),
                    });
                }
            }
        }
    }

    fn check_unused_labels(&mut self) {
        let users = self.label_users();
        for (name, lines) in self.label_defs() {
            if users.get(name).is_none() {
                for line in lines {
                    self.findings.push(LintFinding {
                        line,
                        kind: LintKind::UnusedLabel(name.to_string()),
                    });
                    self.redundants.push(RedundantLine {
                        line,
                        kind: Redundancy::RemoveLabel(name.to_string()),
                    });
                }
            }
        }
    }

    /// After a terminator, everything up to the next label with at least
    /// one referrer cannot execute.
    fn check_unreachable_code(&mut self) {
        let users = self.label_users();
        let mut i = 0;
        while i < self.listing.len() {
            if !self.listing[i].is_terminator() {
                i += 1;
                continue;
            }
            let mut j = i + 1;
            while j < self.listing.len() {
                match &self.listing[j] {
                    Op::Label { name } if users.contains_key(name.as_str()) => break,
                    op if op.is_nop() => {}
                    _ => self.findings.push(LintFinding {
                        line: j,
                        kind: LintKind::UnreachableCode,
                    }),
                }
                j += 1;
            }
            i = j + 1;
        }
    }

    /// An unconditional branch whose target label is the next one reached
    /// is a no-op: anything between the branch and the label is already
    /// unreachable, so it is skipped in the walk.
    fn check_branch_just_before_label(&mut self) {
        for (i, op) in self.listing.iter().enumerate() {
            let Some(target) = op.branch_target() else {
                continue;
            };
            for next in &self.listing[i + 1..] {
                if let Op::Label { name } = next {
                    if name == target {
                        self.findings.push(LintFinding {
                            line: i,
                            kind: LintKind::RedundantBranch,
                        });
                        self.redundants.push(RedundantLine {
                            line: i,
                            kind: Redundancy::RemoveBranch,
                        });
                    }
                    break;
                }
            }
        }
    }

    /// Missing labels, then backward unconditional branches that form a
    /// loop with no way out.
    fn check_loops(&mut self) {
        let users = self.label_users();
        let defs = self.label_defs();

        for (name, user_lines) in &users {
            if !defs.contains_key(name) {
                for &line in user_lines {
                    self.findings.push(LintFinding {
                        line,
                        kind: LintKind::MissingLabel(name.to_string()),
                    });
                }
            }
        }

        for (i, op) in self.listing.iter().enumerate().skip(1) {
            let Some(target) = op.branch_target() else {
                continue;
            };
            for j in (0..i).rev() {
                if let Op::Label { name } = &self.listing[j] {
                    if name == target {
                        if !self.escapable(j, i, &defs) {
                            self.findings.push(LintFinding {
                                line: i,
                                kind: LintKind::InfiniteLoop,
                            });
                        }
                        break;
                    }
                }
            }
        }
    }

    /// Conservative escape analysis over the listing window
    /// `[from..=to]`: a reference to a label defined outside the window,
    /// or a terminator that is not itself a branch, counts as a possible
    /// way out. Over-approximates; only proven-infinite loops are flagged.
    fn escapable(&self, from: usize, to: usize, defs: &IndexMap<&str, Vec<usize>>) -> bool {
        for op in &self.listing[from..=to] {
            let refs = op.label_refs();
            if !refs.is_empty() {
                for target in refs {
                    if let Some(indices) = defs.get(target.as_str()) {
                        if indices.iter().any(|&idx| idx < from || idx > to) {
                            return true;
                        }
                    }
                }
            } else if op.is_terminator() {
                return true;
            }
        }
        false
    }

    /// A version pragma is only meaningful before the first instruction;
    /// a second pragma counts as "after" the first.
    fn check_pragma_position(&mut self) {
        let mut seen_instruction = false;
        for (i, op) in self.listing.iter().enumerate() {
            match op {
                Op::Pragma { .. } => {
                    if seen_instruction {
                        self.findings.push(LintFinding {
                            line: i,
                            kind: LintKind::PragmaAfterInstruction,
                        });
                    }
                    seen_instruction = true;
                }
                op if op.is_nop() => {}
                _ => seen_instruction = true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(name: &str) -> Op {
        Op::Label {
            name: name.to_string(),
        }
    }

    fn branch(target: &str) -> Op {
        Op::Branch {
            target: target.to_string(),
        }
    }

    fn lint(listing: &[Op]) -> (Vec<LintFinding>, Vec<RedundantLine>) {
        Linter::new(listing).lint()
    }

    fn kinds(findings: &[LintFinding]) -> Vec<&LintKind> {
        findings.iter().map(|f| &f.kind).collect()
    }

    #[test]
    fn reports_duplicates_on_every_definition() {
        let listing = vec![label("l"), label("l"), branch("l")];
        let (findings, _) = lint(&listing);
        let dup_lines: Vec<_> = findings
            .iter()
            .filter(|f| matches!(f.kind, LintKind::DuplicateLabel(_)))
            .map(|f| f.line)
            .collect();
        assert_eq!(dup_lines, vec![0, 1]);
    }

    #[test]
    fn unused_label_gets_a_removal_advisory() {
        let listing = vec![label("dead"), Op::Int { value: 1 }];
        let (findings, redundants) = lint(&listing);
        assert_eq!(
            kinds(&findings),
            vec![&LintKind::UnusedLabel("dead".to_string())]
        );
        assert_eq!(redundants.len(), 1);
        assert_eq!(
            redundants[0].kind,
            Redundancy::RemoveLabel("dead".to_string())
        );
        assert_eq!(redundants[0].line, 0);
    }

    #[test]
    fn code_after_err_is_unreachable() {
        let listing = vec![
            Op::Err,
            Op::Int { value: 1 },
            Op::Empty,
            Op::Int { value: 2 },
        ];
        let (findings, _) = lint(&listing);
        let lines: Vec<_> = findings
            .iter()
            .filter(|f| f.kind == LintKind::UnreachableCode)
            .map(|f| f.line)
            .collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn referenced_label_stops_the_unreachable_walk() {
        let listing = vec![
            branch("cont"),
            Op::Int { value: 1 },
            label("cont"),
            Op::Int { value: 2 },
        ];
        let (findings, _) = lint(&listing);
        let lines: Vec<_> = findings
            .iter()
            .filter(|f| f.kind == LintKind::UnreachableCode)
            .map(|f| f.line)
            .collect();
        assert_eq!(lines, vec![1]);
    }

    #[test]
    fn unreferenced_label_does_not_resurrect_code() {
        let listing = vec![
            Op::Return,
            label("orphan"),
            Op::Int { value: 1 },
        ];
        let (findings, _) = lint(&listing);
        let lines: Vec<_> = findings
            .iter()
            .filter(|f| f.kind == LintKind::UnreachableCode)
            .map(|f| f.line)
            .collect();
        assert_eq!(lines, vec![2]);
    }

    #[test]
    fn retsub_terminates_flow() {
        let listing = vec![Op::RetSub, Op::Int { value: 1 }];
        let (findings, _) = lint(&listing);
        assert!(kinds(&findings).contains(&&LintKind::UnreachableCode));
    }

    #[test]
    fn branch_to_immediately_following_label_is_redundant() {
        let listing = vec![branch("next"), label("next")];
        let (findings, redundants) = lint(&listing);
        assert!(kinds(&findings).contains(&&LintKind::RedundantBranch));
        assert_eq!(redundants[0].kind, Redundancy::RemoveBranch);
    }

    #[test]
    fn branch_over_unreachable_code_is_still_redundant() {
        let listing = vec![branch("next"), Op::Int { value: 1 }, label("next")];
        let (findings, _) = lint(&listing);
        assert!(kinds(&findings).contains(&&LintKind::RedundantBranch));
    }

    #[test]
    fn intervening_label_makes_the_branch_meaningful() {
        let listing = vec![
            branch("end"),
            label("other"),
            Op::Int { value: 1 },
            label("end"),
        ];
        let (findings, _) = lint(&listing);
        assert!(!kinds(&findings).contains(&&LintKind::RedundantBranch));
    }

    #[test]
    fn missing_label_reported_at_each_use() {
        let listing = vec![branch("gone"), Op::Bnz {
            target: "gone".to_string(),
        }];
        let (findings, _) = lint(&listing);
        let lines: Vec<_> = findings
            .iter()
            .filter(|f| matches!(f.kind, LintKind::MissingLabel(_)))
            .map(|f| f.line)
            .collect();
        assert_eq!(lines, vec![0, 1]);
    }

    #[test]
    fn tight_backward_branch_is_an_infinite_loop() {
        let listing = vec![label("loop"), branch("loop")];
        let (findings, _) = lint(&listing);
        let loops: Vec<_> = findings
            .iter()
            .filter(|f| f.kind == LintKind::InfiniteLoop)
            .collect();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].line, 1);
    }

    #[test]
    fn a_terminator_inside_the_loop_counts_as_an_escape() {
        let listing = vec![
            label("loop"),
            Op::Bnz {
                target: "loop".to_string(),
            },
            Op::Return,
            branch("loop"),
        ];
        let (findings, _) = lint(&listing);
        assert!(!kinds(&findings).contains(&&LintKind::InfiniteLoop));
    }

    #[test]
    fn a_conditional_exit_to_an_outside_label_counts_as_an_escape() {
        let listing = vec![
            label("loop"),
            Op::Bnz {
                target: "out".to_string(),
            },
            branch("loop"),
            label("out"),
        ];
        let (findings, _) = lint(&listing);
        assert!(!kinds(&findings).contains(&&LintKind::InfiniteLoop));
    }

    #[test]
    fn a_conditional_branch_within_the_loop_is_not_an_escape() {
        let listing = vec![
            label("loop"),
            label("inner"),
            Op::Bnz {
                target: "inner".to_string(),
            },
            branch("loop"),
        ];
        let (findings, _) = lint(&listing);
        assert!(kinds(&findings).contains(&&LintKind::InfiniteLoop));
    }

    #[test]
    fn pragma_after_an_instruction_is_an_error() {
        let listing = vec![
            Op::Pragma { version: 2 },
            Op::Int { value: 1 },
            Op::Pragma { version: 3 },
        ];
        let (findings, _) = lint(&listing);
        let lines: Vec<_> = findings
            .iter()
            .filter(|f| f.kind == LintKind::PragmaAfterInstruction)
            .map(|f| f.line)
            .collect();
        assert_eq!(lines, vec![2]);
    }

    #[test]
    fn pragma_after_only_nops_is_fine() {
        let listing = vec![Op::Empty, label("start"), Op::Pragma { version: 2 }];
        let (findings, _) = lint(&listing);
        assert!(!kinds(&findings).contains(&&LintKind::PragmaAfterInstruction));
    }

    #[test]
    fn severities_follow_the_taxonomy() {
        assert_eq!(
            LintKind::DuplicateLabel(String::new()).severity(),
            Severity::Error
        );
        assert_eq!(
            LintKind::UnusedLabel(String::new()).severity(),
            Severity::Warning
        );
        assert_eq!(LintKind::UnreachableCode.severity(), Severity::Warning);
        assert_eq!(LintKind::RedundantBranch.severity(), Severity::Warning);
        assert_eq!(
            LintKind::MissingLabel(String::new()).severity(),
            Severity::Error
        );
        assert_eq!(LintKind::InfiniteLoop.severity(), Severity::Error);
        assert_eq!(LintKind::PragmaAfterInstruction.severity(), Severity::Error);
    }
}
