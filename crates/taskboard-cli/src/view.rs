//! Text renderings of a board.
//!
//! Two modes over the same state: a flat list with group headers
//! interleaved, and a three-column board. Subtasks are listed under a task
//! only when its subtask list is expanded.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use taskboard_board::Board;
use taskboard_types::{GroupKey, Task};

const COLUMN_WIDTH: usize = 26;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Board,
}

pub fn render(board: &Board, mode: ViewMode) -> String {
    match mode {
        ViewMode::List => render_list(board),
        ViewMode::Board => render_board(board),
    }
}

fn subtask_summary(task: &Task) -> Option<String> {
    match task.subtasks.len() {
        0 => None,
        1 => Some("(1 subtask)".to_string()),
        n => Some(format!("({n} subtasks)")),
    }
}

/// Group headers followed by their tasks, in display order.
pub fn render_list(board: &Board) -> String {
    let mut out = String::new();
    for group in board.groups() {
        let _ = writeln!(out, "{} ({})", group.key().label(), group.len());
        for task in group.tasks() {
            let _ = write!(out, "  [{}] {}", task.order, task.title);
            if let Some(summary) = subtask_summary(task) {
                let _ = write!(out, " {summary}");
            }
            out.push('\n');
            if task.show_subtasks {
                for subtask in &task.subtasks {
                    let _ = writeln!(out, "      {}. {}", subtask.order, subtask.title);
                }
            }
        }
    }
    out
}

fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        format!("{text:<width$}")
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}~")
    }
}

/// Cells for one column: task titles, with expanded subtasks indented below.
fn column(board: &Board, key: GroupKey) -> Vec<String> {
    let mut cells = Vec::new();
    for task in board.group(key).tasks() {
        cells.push(task.title.clone());
        if task.show_subtasks {
            cells.extend(task.subtasks.iter().map(|s| format!("  - {}", s.title)));
        }
    }
    cells
}

/// One line of the board, dropping empty trailing cells.
fn row(cells: &[&str]) -> String {
    let used = cells.iter().rposition(|cell| !cell.is_empty()).map_or(0, |last| last + 1);
    let padded: Vec<String> = cells[..used].iter().map(|cell| fit(cell, COLUMN_WIDTH)).collect();
    padded.join(" | ").trim_end().to_string()
}

/// Three columns side by side.
pub fn render_board(board: &Board) -> String {
    let columns: Vec<Vec<String>> = GroupKey::ALL.iter().map(|key| column(board, *key)).collect();
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);

    let mut out = String::new();
    let header: Vec<String> = GroupKey::ALL
        .iter()
        .map(|key| format!("{} ({})", key.label(), board.group(*key).len()))
        .collect();
    let header: Vec<&str> = header.iter().map(String::as_str).collect();
    let _ = writeln!(out, "{}", row(&header));
    let _ = writeln!(out, "{}", vec!["-".repeat(COLUMN_WIDTH); 3].join("-+-"));

    for index in 0..rows {
        let cells: Vec<&str> = columns
            .iter()
            .map(|cells| cells.get(index).map(String::as_str).unwrap_or(""))
            .collect();
        let _ = writeln!(out, "{}", row(&cells));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_types::{GroupedTasks, Subtask, TaskId};

    fn board() -> Board {
        Board::from_snapshot(GroupedTasks {
            todo: vec![
                Task::new("a", "Alpha", GroupKey::Todo, 0)
                    .with_subtasks(vec![Subtask::new("a0", "step", GroupKey::Todo, 0)]),
                Task::new("b", "Beta", GroupKey::Todo, 1),
            ],
            in_progress: vec![Task::new("c", "Gamma", GroupKey::InProgress, 0)],
            completed: vec![],
        })
    }

    #[test]
    fn test_list_view() {
        let text = render_list(&board());
        assert_eq!(
            text,
            "todo (2)\n  [0] Alpha (1 subtask)\n  [1] Beta\nin progress (1)\n  [0] Gamma\ncompleted (0)\n"
        );
    }

    #[test]
    fn test_list_view_expands_subtasks() {
        let mut board = board();
        board.toggle_subtasks(&TaskId::new("a"));
        assert!(render_list(&board).contains("  [0] Alpha (1 subtask)\n      0. step\n"));
    }

    #[test]
    fn test_board_view_columns() {
        let text = render(&board(), ViewMode::Board);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("todo (2)"));
        assert!(lines[0].contains("| in progress (1)"));
        assert!(lines[2].starts_with("Alpha"));
        assert!(lines[2].contains("| Gamma"));
        assert_eq!(lines[3].trim_end(), "Beta");
    }

    #[test]
    fn test_fit_truncates() {
        assert_eq!(fit("abcdef", 4), "abc~");
        assert_eq!(fit("ab", 4), "ab  ");
    }
}
