use comfy_table::{Attribute, Cell, Color, Row, Table};
use scheduler_core::models::Task;

pub fn display_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    println!("{}", render_tasks(tasks));
}

pub fn render_tasks(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Title", "Repeat", "Comment"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(&task.id));
        row.add_cell(Cell::new(task.date.format("%Y-%m-%d")));

        let mut title = String::new();
        if task.is_recurring() {
            title.push('↻'); // Recurring symbol
            title.push(' ');
        }
        title.push_str(&task.title);
        row.add_cell(Cell::new(title).add_attribute(Attribute::Bold));

        let repeat_cell = if task.is_recurring() {
            Cell::new(&task.repeat).fg(Color::Cyan)
        } else {
            Cell::new("-").fg(Color::DarkGrey)
        };
        row.add_cell(repeat_cell);
        row.add_cell(Cell::new(&task.comment));

        table.add_row(row);
    }

    table
}
