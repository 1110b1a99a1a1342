//! End-to-end wipe engine tests: job submission, the run guard, log
//! protocol, and end-of-target handling against a simulated device.

mod common;

use common::{create_file, FixedCapacityTarget};
use std::sync::Arc;
use tempfile::TempDir;
use vanish_wipe::engine::DeviceWiper;
use vanish_wipe::{JobTracker, WipeEngine, WipeError, WipeJob, WipeOptions};

#[test]
fn test_directory_job_runs_to_completion() {
    let dir = TempDir::new().expect("tempdir");
    let b = create_file(dir.path(), "b.txt", b"bbbb");
    let c = create_file(dir.path(), "sub/c.txt", &vec![3u8; 8192]);

    let tracker = JobTracker::new();
    let engine = WipeEngine::new(Arc::clone(&tracker));
    let worker = engine
        .submit(WipeJob::new(dir.path().to_string_lossy()))
        .expect("job should be accepted");
    worker.join().expect("worker should not panic");

    assert!(!b.exists());
    assert!(!c.exists());
    assert!(dir.path().join("sub").is_dir());

    let status = tracker.status();
    assert!(!status.running, "slot must be released after the job");
    assert!(status.logs[0].starts_with("[!] WARNING: This will ERASE all data on"));
    assert!(status.logs[1].starts_with("[+] Starting secure wipe on"));
    assert_eq!(
        status
            .logs
            .iter()
            .filter(|l| l.starts_with("[+] Wiped and deleted"))
            .count(),
        2
    );
    assert!(
        status
            .logs
            .last()
            .expect("log should not be empty")
            .starts_with("[+] Secure wipe completed for directory"),
        "job must end with the directory completion line"
    );
}

#[cfg(unix)]
#[test]
fn test_directory_job_completes_despite_unopenable_file() {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    // Root ignores file modes, so the failure cannot be provoked.
    if unsafe { libc::geteuid() } == 0 {
        return;
    }

    let dir = TempDir::new().expect("tempdir");
    let locked = create_file(dir.path(), "a_locked", b"cannot open");
    let b = create_file(dir.path(), "b.txt", b"bbbb");
    let c = create_file(dir.path(), "c.txt", b"cccc");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

    let tracker = JobTracker::new();
    let engine = WipeEngine::new(Arc::clone(&tracker));
    let worker = engine
        .submit(WipeJob::new(dir.path().to_string_lossy()))
        .expect("job should be accepted");
    worker.join().expect("worker should not panic");

    assert!(locked.exists(), "the unopenable file stays behind");
    assert!(!b.exists());
    assert!(!c.exists());

    let status = tracker.status();
    assert!(!status.running);
    assert_eq!(
        status
            .logs
            .iter()
            .filter(|l| l.starts_with("[-] Error wiping"))
            .count(),
        1,
        "the locked file is reported once"
    );
    assert!(
        status
            .logs
            .last()
            .expect("log should not be empty")
            .starts_with("[+] Secure wipe completed for directory"),
        "one bad file must not fail the job"
    );

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).expect("chmod back");
}

#[test]
fn test_missing_target_fails_without_side_effects() {
    let tracker = JobTracker::new();
    let engine = WipeEngine::new(Arc::clone(&tracker));

    let worker = engine
        .submit(WipeJob::new("/no/such/path/anywhere"))
        .expect("submission itself is accepted");
    worker.join().expect("worker should not panic");

    let status = tracker.status();
    assert!(!status.running);
    assert_eq!(
        status.logs,
        vec!["[-] Path /no/such/path/anywhere not found!".to_string()],
        "a missing target produces only the not-found line"
    );

    // The slot is free again: a new job must be accepted.
    let dir = TempDir::new().expect("tempdir");
    let worker = engine
        .submit(WipeJob::new(dir.path().to_string_lossy()))
        .expect("tracker should accept a new job");
    worker.join().expect("worker should not panic");
}

#[test]
fn test_second_submission_rejected_while_running() {
    let tracker = JobTracker::new();
    let engine = WipeEngine::new(Arc::clone(&tracker));

    // Stand in for an active worker by holding the run guard directly.
    let _guard = tracker.try_begin().expect("claim the slot");
    tracker.push("[*] Pass 1/3 ... (this may take time)");

    let result = engine.submit(WipeJob::new("/tmp/whatever"));
    assert!(matches!(result, Err(WipeError::AlreadyRunning)));

    let status = tracker.status();
    assert!(status.running, "the active job keeps the slot");
    assert_eq!(
        status.logs,
        vec!["[*] Pass 1/3 ... (this may take time)".to_string()],
        "a rejected submission must not touch the active job's log"
    );
}

#[test]
fn test_invalid_job_rejected_before_claiming_the_slot() {
    let tracker = JobTracker::new();
    let engine = WipeEngine::new(Arc::clone(&tracker));

    let job = WipeJob::with_options(
        "/tmp/whatever",
        WipeOptions {
            passes: 0,
            block_size: 4096,
        },
    );
    assert!(matches!(
        engine.submit(job),
        Err(WipeError::InvalidInput(_))
    ));
    assert!(
        !tracker.is_running(),
        "a rejected job must not claim the run slot"
    );
    assert!(tracker.status().logs.is_empty());
}

#[test]
fn test_device_pass_ends_at_physical_end_of_target() {
    let tracker = JobTracker::new();
    // Block size far beyond the capacity forces a short write immediately.
    let options = WipeOptions {
        passes: 3,
        block_size: 1024 * 1024,
    };
    let mut device = FixedCapacityTarget::new(64 * 1024);

    DeviceWiper::overwrite(&mut device, &options, &tracker).expect("overwrite should succeed");

    assert_eq!(device.writes, 3, "one write per pass");
    assert_eq!(device.short_writes, 3, "every pass ends on the short write");
    assert_eq!(device.syncs, 3, "one durable sync per pass");
    assert!(
        device.data().iter().any(|&b| b != 0),
        "capacity must be overwritten with random data"
    );

    let logs = tracker.status().logs;
    assert_eq!(logs.len(), 3);
    for (i, line) in logs.iter().enumerate() {
        assert!(line.contains(&format!("Pass {}/3", i + 1)));
    }
}

#[test]
fn test_device_passes_overwrite_from_the_start_each_time() {
    let tracker = JobTracker::new();
    // Capacity is a multiple of the block size: the pass ends on the
    // write-error signal instead of a short write.
    let options = WipeOptions {
        passes: 2,
        block_size: 16 * 1024,
    };
    let mut device = FixedCapacityTarget::new(64 * 1024);

    DeviceWiper::overwrite(&mut device, &options, &tracker).expect("overwrite should succeed");

    // 4 full writes per pass, then one failing write signalling the end.
    assert_eq!(device.writes, 8, "only whole-block writes land");
    assert_eq!(device.short_writes, 0);
    assert_eq!(device.syncs, 2);
    assert!(device.data().iter().any(|&b| b != 0));
}
