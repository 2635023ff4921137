use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table},
    Frame,
};
use crate::checklist::ApprovalPhase;
use crate::finance::format_won;
use crate::reservations::ROOMS;
use super::app::{App, InputMode, ViewMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Body
            Constraint::Length(3)  // Help / status
        ].as_ref())
        .split(f.area());

    match app.view_mode {
        ViewMode::Checklist => draw_checklist(f, app, chunks[0], chunks[1]),
        ViewMode::Finance => draw_finance(f, app, chunks[0], chunks[1]),
    }

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Checklist => "q: Quit | ←/→: Day | Space: Staff done | v: Verify | a: Add | d: Del | f: Filter | Tab: Finance",
            ViewMode::Finance => "q: Quit | ←/→: Month | Tab: Checklist",
        },
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };
    let (text, style) = match &app.status {
        Some(msg) => (msg.as_str(), Style::default().fg(Color::Red)),
        None => (help_text, Style::default().fg(Color::Gray)),
    };
    let help = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);

    // Render Input Box if needed
    if app.input_mode == InputMode::Adding {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);
        let title = match app.add_state.step {
            0 => "Add Task: Category (1 홍보 / 2 숙소 / 3 재고 / 4 예약)",
            _ => "Add Task: Enter Description",
        };
        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(input, area);
    }
}

fn draw_checklist(f: &mut Frame, app: &mut App, header: Rect, body: Rect) {
    let stats = app.desk.checklist.stats(&app.date);
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "{} · {} · 승인 {} / {}",
            app.session.user().pension_name, app.date, stats.verified, stats.total
        )))
        .gauge_style(Style::default().fg(Color::Green))
        .percent(stats.done_percent.min(100) as u16);
    f.render_widget(gauge, header);

    let rows: Vec<Row> = app
        .visible_tasks()
        .iter()
        .map(|t| {
            let status = app.desk.checklist.status(&app.date, &t.id);
            let phase = ApprovalPhase::of(&status);
            let style = match phase {
                ApprovalPhase::Verified => Style::default().fg(Color::Green).add_modifier(Modifier::CROSSED_OUT),
                ApprovalPhase::AwaitingVerification => Style::default().fg(Color::Blue),
                ApprovalPhase::Open => Style::default(),
            };
            Row::new(vec![
                Cell::from(t.id.clone()),
                Cell::from(t.category.label()),
                Cell::from(t.task.clone()),
                Cell::from(if status.staff_done { "근무자 완료" } else { "-" }),
                Cell::from(if status.admin_verified { "승인 완료" } else { "-" }),
                Cell::from(phase.label()),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(12),
    ];

    let title = match app.filter {
        Some(c) => format!("Checklist - {} ({})", c.label(), app.desk.checklist.count_in(c)),
        None => format!("Checklist - 전체 ({})", app.desk.checklist.tasks.len()),
    };
    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "Category", "Task", "Staff", "Admin", "Status"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, body, &mut app.state);
}

fn draw_finance(f: &mut Frame, app: &mut App, header: Rect, body: Rect) {
    let report = app.report();
    let net_style = if report.net_cash_flow < 0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };
    let title = Paragraph::new(format!(
        "매출 {}  지출 {}  순이익 {}",
        format_won(report.total_revenue as i64),
        format_won(report.grand_total as i64),
        format_won(report.net_cash_flow)
    ))
    .style(net_style)
    .block(Block::default().borders(Borders::ALL).title(format!(
        "{}월 {} 재무 리포트 ({})",
        report.month.month, app.session.user().pension_name, report.month
    )));
    f.render_widget(title, header);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(body);

    let mut money_rows: Vec<Row> = ROOMS
        .iter()
        .map(|room| Row::new(vec![room.to_string(), format_won(report.revenue_for(room) as i64)]))
        .collect();
    money_rows.push(Row::new(vec!["고정 경비".to_string(), format_won(report.fixed_total as i64)]));
    for fx in &app.desk.ledger.fixed {
        money_rows.push(
            Row::new(vec![format!("  {}", fx.name), format_won(fx.amount as i64)])
                .style(Style::default().fg(Color::Gray)),
        );
    }
    money_rows.push(Row::new(vec!["변동 지출".to_string(), format_won(report.variable_total as i64)]));
    let money = Table::new(money_rows, [Constraint::Min(14), Constraint::Length(14)])
        .header(Row::new(vec!["Item", "Amount"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title("Settlement"));
    f.render_widget(money, columns[0]);

    let breakdown_rows: Vec<Row> = report
        .breakdown
        .iter()
        .map(|(name, amount)| {
            Row::new(vec![
                name.clone(),
                format_won(*amount as i64),
                format!("{}%", report.category_percent(*amount)),
            ])
        })
        .collect();
    let breakdown = Table::new(
        breakdown_rows,
        [Constraint::Min(14), Constraint::Length(14), Constraint::Length(6)],
    )
    .header(Row::new(vec!["Expense", "Amount", "Share"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .bottom_margin(1))
    .block(Block::default().borders(Borders::ALL).title("지출 항목별 요약"));
    f.render_widget(breakdown, columns[1]);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Length(r.height.saturating_sub(height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
