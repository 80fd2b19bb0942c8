// tests/guard.rs

use std::error::Error;
use std::fs;

use procmux::errors::ProcmuxError;
use procmux::guard::{RunGuard, read_guard_pid};
use procmux_test_utils::builders::TestWorkspace;
use procmux_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

/// Pid of a process that has already exited and been reaped.
#[cfg(unix)]
fn dead_pid() -> u32 {
    let mut child = std::process::Command::new("true").spawn().unwrap();
    let pid = child.id();
    child.wait().unwrap();
    pid
}

#[test]
fn acquire_writes_own_pid_and_release_removes_it() -> TestResult {
    init_tracing();
    let ws = TestWorkspace::new();
    let path = ws.paths().guard;

    let guard = RunGuard::acquire(&path)?;
    assert_eq!(guard.pid(), std::process::id());
    assert_eq!(read_guard_pid(&path)?, Some(std::process::id()));

    guard.release()?;
    assert!(!path.exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn live_guard_blocks_a_second_instance() -> TestResult {
    let ws = TestWorkspace::new();
    let path = ws.paths().guard;
    let live = std::process::id();
    fs::write(&path, format!("{live}\n"))?;

    match RunGuard::acquire_for(&path, 1) {
        Err(ProcmuxError::AlreadyRunning { pid, path: p }) => {
            assert_eq!(pid, live);
            assert_eq!(p, path);
        }
        other => panic!("Expected AlreadyRunning, got: {:?}", other),
    }

    // The existing guard is left alone.
    assert_eq!(fs::read_to_string(&path)?, format!("{live}\n"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn stale_guard_is_replaced() -> TestResult {
    let ws = TestWorkspace::new();
    let path = ws.paths().guard;
    fs::write(&path, format!("{}\n", dead_pid()))?;

    let guard = RunGuard::acquire(&path)?;
    assert_eq!(read_guard_pid(&path)?, Some(std::process::id()));
    guard.release()?;
    Ok(())
}

#[test]
fn unreadable_guard_contents_count_as_stale() -> TestResult {
    let ws = TestWorkspace::new();
    let path = ws.paths().guard;
    fs::write(&path, "not a pid")?;

    let guard = RunGuard::acquire(&path)?;
    assert_eq!(read_guard_pid(&path)?, Some(std::process::id()));
    drop(guard);
    Ok(())
}

#[test]
fn dropping_the_guard_removes_the_file() -> TestResult {
    let ws = TestWorkspace::new();
    let path = ws.paths().guard;

    {
        let _guard = RunGuard::acquire(&path)?;
        assert!(path.exists());
    }

    assert!(!path.exists());
    Ok(())
}

#[cfg(unix)]
#[test]
fn concurrent_acquires_have_exactly_one_winner() -> TestResult {
    init_tracing();
    let ws = TestWorkspace::new();
    let path = ws.paths().guard;

    for _ in 0..20 {
        let barrier = std::sync::Arc::new(std::sync::Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let path = path.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    RunGuard::acquire(&path)
                })
            })
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1, "results: {results:?}");
        for result in &results {
            if let Err(e) = result {
                assert!(matches!(e, ProcmuxError::AlreadyRunning { .. }), "unexpected error: {e}");
            }
        }
        assert_eq!(read_guard_pid(&path)?, Some(std::process::id()));

        drop(results);
        assert!(!path.exists());
    }

    let leftovers: Vec<_> = fs::read_dir(ws.path())?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    Ok(())
}
