use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    NextCard,
    PrevCard,
    ChartLine,
    ChartCandle,
    SwitchTimeframe(&'static str),
    ToggleFocus,
    CloseFocus,
}

pub fn parse_main_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Right | KeyCode::Tab => Some(UiCommand::NextCard),
        KeyCode::Left | KeyCode::BackTab => Some(UiCommand::PrevCard),
        KeyCode::Enter => Some(UiCommand::ToggleFocus),
        KeyCode::Esc => Some(UiCommand::CloseFocus),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'j' => Some(UiCommand::NextCard),
            'k' => Some(UiCommand::PrevCard),
            'l' => Some(UiCommand::ChartLine),
            'c' => Some(UiCommand::ChartCandle),
            '1' => Some(UiCommand::SwitchTimeframe("1m")),
            '2' => Some(UiCommand::SwitchTimeframe("5m")),
            '3' => Some(UiCommand::SwitchTimeframe("15m")),
            'f' => Some(UiCommand::ToggleFocus),
            _ => None,
        },
        _ => None,
    }
}
