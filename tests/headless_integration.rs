use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use keybored::input;
use keybored::runtime::{
    FixedTicker, KeyboredEvent, KeyboredEventSource, Runner, SessionDriver, TestEventSource,
};
use keybored::session::{Mode, Session, SessionConfig};

fn driver(list: &[&str], mode: Mode, goal: u32) -> SessionDriver {
    let words = list.iter().map(|w| w.to_string()).collect();
    SessionDriver::new(Session::start(words, SessionConfig::new(mode, goal)).unwrap())
}

fn send_text(es: &TestEventSource, text: &str) {
    for c in text.chars() {
        es.sender()
            .send(KeyboredEvent::Key(KeyEvent::new(
                KeyCode::Char(c),
                KeyModifiers::NONE,
            )))
            .unwrap();
    }
}

// Headless integration using the internal runtime + SessionDriver without a TTY
// Verifies that a typing flow completes via Runner/TestEventSource.
#[test]
fn headless_words_session_completes() {
    let mut d = driver(&["cat", "dog", "fox"], Mode::Words, 3);

    let es = TestEventSource::new();
    send_text(&es, "cat dog fox ");
    let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(5)));

    // Act: drive a tiny event loop until finished (or bounded steps)
    for _ in 0..100u32 {
        let now = Instant::now();
        match runner.step() {
            KeyboredEvent::Tick => d.on_tick(now),
            KeyboredEvent::Key(key) => {
                if let Some(command) = input::command_for(&key) {
                    d.apply(command, now);
                }
            }
            _ => {}
        }
        if d.session().has_finished() {
            break;
        }
    }

    let session = d.session();
    assert!(session.has_finished(), "session should have finished");
    assert_eq!(session.word_index(), 3);
    assert_eq!(session.score().accuracy_percent, 100);
    assert!(!d.clock_running());

    let record = d.take_record().expect("finished session yields a record");
    assert_eq!(record.mode, Mode::Words);
    assert_eq!(record.goal, 3);
    assert!(d.take_record().is_none(), "record is handed out once");
}

#[test]
fn headless_time_session_without_input_scores_zero() {
    let mut session = Session::start(
        vec!["cat".to_string(), "dog".to_string()],
        SessionConfig::new(Mode::Time, 15),
    )
    .unwrap();

    // an empty edit starts the session; the timer then runs down untouched
    session.submit_input("");
    for _ in 0..15 {
        session.tick();
    }

    assert!(session.has_finished());
    assert_eq!(session.timer(), 0);
    assert_eq!(session.score().standard_wpm, 0);
}

#[test]
fn headless_timed_session_finishes_by_time() {
    let mut d = driver(&["hello", "world"], Mode::Time, 1);
    let t0 = Instant::now();
    d.apply(input::Command::Type('h'), t0);

    let es = TestEventSource::new();
    let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(10)));

    // ticks arrive every 10ms; the clock fires once a full second has passed
    let deadline = t0 + Duration::from_secs(3);
    while !d.session().has_finished() && Instant::now() < deadline {
        if let KeyboredEvent::Tick = runner.step() {
            d.on_tick(Instant::now());
        }
    }

    assert!(
        d.session().has_finished(),
        "timed session should finish by timeout"
    );
    assert!(d.take_record().is_some());
}

#[test]
fn headless_restart_mid_session() {
    let mut d = driver(&["cat", "dog"], Mode::Time, 15);
    let es = TestEventSource::new();
    send_text(&es, "ca");
    es.sender()
        .send(KeyboredEvent::Key(KeyEvent::new(
            KeyCode::Enter,
            KeyModifiers::NONE,
        )))
        .unwrap();
    let runner = Runner::new(es, FixedTicker::new(Duration::from_millis(5)));

    let mut signals = Vec::new();
    for _ in 0..3 {
        if let KeyboredEvent::Key(key) = runner.step() {
            let command = input::command_for(&key).unwrap();
            signals.push(d.apply(command, Instant::now()));
        }
    }

    assert_eq!(signals.last(), Some(&input::Signal::Restart));
    assert!(!d.session().has_started());
    assert!(!d.clock_running());
    assert_eq!(d.session().input(), "");
}
