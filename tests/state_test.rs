/// 伺服器狀態測試
///
/// 透過指令通道驅動 State，檢查送出的 AOI 通知

use aoi_system::{AoiConfig, AoiError};
use omb_aoi::{NoticeKind, PlayerCommand, State};

fn setup() -> (
    State,
    crossbeam_channel::Sender<PlayerCommand>,
    crossbeam_channel::Receiver<omb_aoi::AoiNotice>,
) {
    let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
    let (notice_tx, notice_rx) = crossbeam_channel::unbounded();
    let state = State::new(AoiConfig::default(), cmd_rx, notice_tx).unwrap();
    (state, cmd_tx, notice_rx)
}

fn send(tx: &crossbeam_channel::Sender<PlayerCommand>, lines: &[&str]) {
    for line in lines {
        tx.send(line.parse().unwrap()).unwrap();
    }
}

#[test]
fn test_tick_applies_queued_commands() {
    let (mut state, tx, rx) = setup();
    send(&tx, &["enter 1 pp 49 49", "enter 2 wl 8 8", "enter 3 sd 0 0"]);
    assert_eq!(state.tick(), 3);

    let notices: Vec<_> = rx.try_iter().map(|n| (n.kind, n.subject, n.other)).collect();
    assert_eq!(notices, vec![(NoticeKind::Meet, 3, 2)]);

    send(&tx, &["move 2 40 40", "leave 3"]);
    assert_eq!(state.tick(), 2);
    let notices: Vec<_> = rx.try_iter().map(|n| (n.kind, n.subject, n.other)).collect();
    assert_eq!(
        notices,
        vec![
            (NoticeKind::Leave, 2, 3),
            (NoticeKind::Enter, 2, 1),
        ]
    );
    assert_eq!(state.aoi().lock().visible_ids(1).unwrap(), vec![2]);
    assert_eq!(state.aoi().lock().len(), 2);
}

#[test]
fn test_rejected_commands_are_skipped() {
    let (mut state, tx, rx) = setup();
    send(&tx, &["enter 1 pp 10 10", "enter 1 dup 11 11", "move 1 99 0", "leave 5", "query 1"]);
    assert_eq!(state.tick(), 2);
    assert!(rx.try_iter().next().is_none());

    assert_eq!(
        state.apply(&PlayerCommand::Leave { id: 5 }),
        Err(AoiError::NotFound(5))
    );
    assert_eq!(
        state.apply(&PlayerCommand::Query { id: 9 }),
        Err(AoiError::NotFound(9))
    );
}

#[test]
fn test_depart_notices_every_counterpart() {
    let (mut state, tx, rx) = setup();
    send(&tx, &["enter 1 a 20 20", "enter 2 b 22 20", "enter 3 c 18 23", "leave 1"]);
    assert_eq!(state.tick(), 4);
    let mut departs: Vec<_> = rx
        .try_iter()
        .filter(|n| n.kind == NoticeKind::Depart)
        .map(|n| (n.subject, n.other))
        .collect();
    departs.sort();
    assert_eq!(departs, vec![(1, 2), (1, 3)]);
}
