use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tempfile::TempDir;

use plugdrop_core::catalog::ManifestCatalog;
use plugdrop_core::config::TargetProfile;
use plugdrop_core::deploy::Deployer;
use plugdrop_core::process::{ProcessControl, RestartController, TokioRestartScheduler};
use plugdrop_core::provision::Provisioner;
use plugdrop_core::session::{Flow, SessionDriver, SessionEvent};
use plugdrop_core::settings::{MemorySettingsStore, TargetSettings};

/// Holds every `terminate` call until the gate sender is dropped.
struct GatedProcesses {
    entered: Mutex<Sender<String>>,
    gate: Mutex<Receiver<()>>,
    launched: Mutex<Vec<PathBuf>>,
}

impl ProcessControl for GatedProcesses {
    fn terminate(&self, name: &str) -> io::Result<()> {
        let _ = self.entered.lock().unwrap().send(name.to_string());
        // Err once the sender is gone: the gate is open.
        let _ = self.gate.lock().unwrap().recv();
        Ok(())
    }

    fn launch_detached(&self, executable: &Path) -> io::Result<()> {
        self.launched.lock().unwrap().push(executable.to_path_buf());
        Ok(())
    }
}

fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    done()
}

#[test]
fn session_keeps_handling_input_while_restart_runs() {
    let temp = TempDir::new().unwrap();
    let manifests = temp.path().join("manifests");
    for name in ["first", "second"] {
        fs::create_dir_all(manifests.join(name)).unwrap();
        fs::write(manifests.join(name).join(format!("{name}.lua")), name).unwrap();
    }
    let install = temp.path().join("install");
    fs::create_dir_all(&install).unwrap();
    fs::write(install.join("app.bin"), "").unwrap();

    let profile = TargetProfile {
        executable: "app.bin".to_string(),
        ..TargetProfile::default()
    };
    let store = Arc::new(MemorySettingsStore::new());
    store.set("Software/Vendor/App", "InstallPath", &install.to_string_lossy());
    let settings = TargetSettings::new(store, profile.clone());

    let (entered_tx, entered_rx) = mpsc::channel();
    let (gate_tx, gate_rx) = mpsc::channel::<()>();
    let processes = Arc::new(GatedProcesses {
        entered: Mutex::new(entered_tx),
        gate: Mutex::new(gate_rx),
        launched: Mutex::new(Vec::new()),
    });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let scheduler = TokioRestartScheduler::new(
        runtime.handle().clone(),
        Arc::new(RestartController::new(settings.clone(), processes.clone())),
    );
    let mut driver = SessionDriver::start(
        settings,
        Deployer::new(ManifestCatalog::new(manifests), Provisioner::new(profile)),
        Arc::new(scheduler),
    );

    assert_eq!(driver.dispatch(SessionEvent::Deploy), Flow::Continue);
    assert!(driver.session().status().starts_with("Deployed "));

    // The restart is parked inside terminate; input is still handled.
    entered_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("restart task should start");
    assert_eq!(driver.dispatch(SessionEvent::MoveDown), Flow::Continue);
    assert_eq!(driver.session().cursor(), 1);
    assert!(processes.launched.lock().unwrap().is_empty());

    drop(gate_tx);

    assert!(wait_until(Duration::from_secs(5), || {
        processes.launched.lock().unwrap().len() == 1
    }));
    assert_eq!(
        *processes.launched.lock().unwrap(),
        vec![install.join("app.bin")]
    );
    runtime.shutdown_background();
}
