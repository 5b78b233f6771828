use crossterm::event::KeyCode;

use coindeck::input::{parse_main_command, UiCommand};

#[test]
fn arrow_and_vim_keys_select_cards() {
    assert_eq!(
        parse_main_command(&KeyCode::Right),
        Some(UiCommand::NextCard)
    );
    assert_eq!(parse_main_command(&KeyCode::Left), Some(UiCommand::PrevCard));
    assert_eq!(
        parse_main_command(&KeyCode::Char('j')),
        Some(UiCommand::NextCard)
    );
    assert_eq!(
        parse_main_command(&KeyCode::Char('K')),
        Some(UiCommand::PrevCard)
    );
}

#[test]
fn chart_mode_keys() {
    assert_eq!(
        parse_main_command(&KeyCode::Char('l')),
        Some(UiCommand::ChartLine)
    );
    assert_eq!(
        parse_main_command(&KeyCode::Char('c')),
        Some(UiCommand::ChartCandle)
    );
}

#[test]
fn timeframe_keys_map_to_supported_set() {
    assert_eq!(
        parse_main_command(&KeyCode::Char('1')),
        Some(UiCommand::SwitchTimeframe("1m"))
    );
    assert_eq!(
        parse_main_command(&KeyCode::Char('2')),
        Some(UiCommand::SwitchTimeframe("5m"))
    );
    assert_eq!(
        parse_main_command(&KeyCode::Char('3')),
        Some(UiCommand::SwitchTimeframe("15m"))
    );
}

#[test]
fn focus_keys() {
    assert_eq!(
        parse_main_command(&KeyCode::Char('f')),
        Some(UiCommand::ToggleFocus)
    );
    assert_eq!(
        parse_main_command(&KeyCode::Enter),
        Some(UiCommand::ToggleFocus)
    );
    assert_eq!(parse_main_command(&KeyCode::Esc), Some(UiCommand::CloseFocus));
}

#[test]
fn unmapped_keys_are_ignored() {
    assert_eq!(parse_main_command(&KeyCode::Char('z')), None);
    assert_eq!(parse_main_command(&KeyCode::Home), None);
}
