use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use plugdrop_core::config::TargetProfile;
use plugdrop_core::process::{
    ProcessControl, RestartController, RestartOutcome, TokioRestartScheduler,
};
use plugdrop_core::settings::{MemorySettingsStore, TargetSettings};

#[derive(Default)]
struct FakeProcesses {
    terminated: Mutex<Vec<String>>,
    launched: Mutex<Vec<PathBuf>>,
    fail_terminate: bool,
    fail_launch: bool,
}

impl ProcessControl for FakeProcesses {
    fn terminate(&self, name: &str) -> io::Result<()> {
        self.terminated.lock().unwrap().push(name.to_string());
        if self.fail_terminate {
            Err(io::Error::other("no such process"))
        } else {
            Ok(())
        }
    }

    fn launch_detached(&self, executable: &Path) -> io::Result<()> {
        if self.fail_launch {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        self.launched.lock().unwrap().push(executable.to_path_buf());
        Ok(())
    }
}

fn profile() -> TargetProfile {
    TargetProfile {
        executable: "app.bin".to_string(),
        ..TargetProfile::default()
    }
}

fn controller(
    store: Arc<MemorySettingsStore>,
    processes: Arc<FakeProcesses>,
) -> RestartController {
    RestartController::new(TargetSettings::new(store, profile()), processes)
}

fn install_with_executable(temp: &TempDir) -> PathBuf {
    let install = temp.path().join("install");
    fs::create_dir_all(&install).unwrap();
    fs::write(install.join("app.bin"), "#!/bin/true\n").unwrap();
    install
}

fn store_pointing_at(install: &Path) -> Arc<MemorySettingsStore> {
    let store = Arc::new(MemorySettingsStore::new());
    store.set("Software/Vendor/App", "InstallPath", &install.to_string_lossy());
    store
}

#[test]
fn terminates_all_names_then_relaunches() {
    let temp = TempDir::new().unwrap();
    let install = install_with_executable(&temp);
    let processes = Arc::new(FakeProcesses::default());

    let outcome = controller(store_pointing_at(&install), processes.clone()).restart_blocking();

    assert_eq!(outcome, RestartOutcome::Relaunched);
    assert_eq!(
        *processes.terminated.lock().unwrap(),
        vec!["app".to_string(), "app-helper".to_string()]
    );
    assert_eq!(
        *processes.launched.lock().unwrap(),
        vec![install.join("app.bin")]
    );
}

#[test]
fn termination_failures_do_not_stop_relaunch() {
    let temp = TempDir::new().unwrap();
    let install = install_with_executable(&temp);
    let processes = Arc::new(FakeProcesses {
        fail_terminate: true,
        ..FakeProcesses::default()
    });

    let outcome = controller(store_pointing_at(&install), processes.clone()).restart_blocking();

    assert_eq!(outcome, RestartOutcome::Relaunched);
    assert_eq!(processes.terminated.lock().unwrap().len(), 2);
}

#[test]
fn unresolved_install_location_gives_up_silently() {
    let processes = Arc::new(FakeProcesses::default());

    let outcome =
        controller(Arc::new(MemorySettingsStore::new()), processes.clone()).restart_blocking();

    assert_eq!(outcome, RestartOutcome::InstallUnresolved);
    assert_eq!(processes.terminated.lock().unwrap().len(), 2);
    assert!(processes.launched.lock().unwrap().is_empty());
}

#[test]
fn missing_executable_is_not_launched() {
    let temp = TempDir::new().unwrap();
    let processes = Arc::new(FakeProcesses::default());

    let outcome = controller(store_pointing_at(temp.path()), processes.clone()).restart_blocking();

    assert_eq!(outcome, RestartOutcome::ExecutableMissing);
    assert!(processes.launched.lock().unwrap().is_empty());
}

#[test]
fn launch_failure_is_swallowed() {
    let temp = TempDir::new().unwrap();
    let install = install_with_executable(&temp);
    let processes = Arc::new(FakeProcesses {
        fail_launch: true,
        ..FakeProcesses::default()
    });

    let outcome = controller(store_pointing_at(&install), processes).restart_blocking();

    assert_eq!(outcome, RestartOutcome::LaunchFailed);
}

#[test]
fn install_location_is_reread_at_restart() {
    let temp = TempDir::new().unwrap();
    let old_install = temp.path().join("old");
    fs::create_dir_all(&old_install).unwrap();
    let new_install = install_with_executable(&temp);
    let store = store_pointing_at(&old_install);
    let processes = Arc::new(FakeProcesses::default());
    let controller = controller(store.clone(), processes.clone());

    store.set(
        "Software/Vendor/App",
        "InstallPath",
        &new_install.to_string_lossy(),
    );

    assert_eq!(controller.restart_blocking(), RestartOutcome::Relaunched);
    assert_eq!(
        *processes.launched.lock().unwrap(),
        vec![new_install.join("app.bin")]
    );
}

#[tokio::test]
async fn scheduled_restart_runs_in_background() {
    let temp = TempDir::new().unwrap();
    let install = install_with_executable(&temp);
    let processes = Arc::new(FakeProcesses::default());
    let scheduler = TokioRestartScheduler::new(
        tokio::runtime::Handle::current(),
        Arc::new(controller(store_pointing_at(&install), processes.clone())),
    );

    let ticket = scheduler.spawn();

    assert_eq!(ticket.wait().await, Some(RestartOutcome::Relaunched));
    assert_eq!(processes.launched.lock().unwrap().len(), 1);
    assert!(!scheduler.cancellation_token().is_cancelled());
}
