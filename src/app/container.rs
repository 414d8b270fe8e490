use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, FFprobeAdapter, LocalFsAdapter, TracingLogAdapter};
use crate::app::{
    batch_interactor::{BatchInteractor, IntermediateWorkspace},
    edit_interactor::EditInteractor,
    inspect_interactor::InspectInteractor,
};
use crate::config_initialization::Settings;
use crate::domain::errors::DomainError;
use crate::domain::model::OverwritePolicy;
use crate::ports::{ExecutePort, FsPort, LogPort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn edit_interactor(&self) -> Arc<EditInteractor>;
    fn batch_interactor(&self) -> Arc<BatchInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn fs_port(&self) -> Arc<dyn FsPort>;
    fn overwrite_policy(&self) -> OverwritePolicy;
    fn new_workspace(&self) -> Result<IntermediateWorkspace, DomainError>;
}

pub struct DefaultAppContainer {
    edit_interactor: Arc<EditInteractor>,
    batch_interactor: Arc<BatchInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
    fs_port: Arc<dyn FsPort>,
    settings: Settings,
}

impl DefaultAppContainer {
    /// Wire the ffmpeg-backed adapters described by `settings`
    pub fn new(settings: Settings) -> Self {
        let probe_port: Arc<dyn ProbePort> =
            Arc::new(FFprobeAdapter::new(settings.ffprobe_path.clone()));
        let execute_port: Arc<dyn ExecutePort> =
            Arc::new(FFmpegAdapter::new(settings.ffmpeg_path.clone()));
        let fs_port: Arc<dyn FsPort> = Arc::new(LocalFsAdapter::new());
        let log_port: Arc<dyn LogPort> = Arc::new(TracingLogAdapter::new(settings.log_level));

        Self::with_ports(settings, probe_port, execute_port, fs_port, log_port)
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(
        settings: Settings,
        probe_port: Arc<dyn ProbePort>,
        execute_port: Arc<dyn ExecutePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        let edit_interactor = Arc::new(EditInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&execute_port),
            Arc::clone(&fs_port),
            Arc::clone(&log_port),
            settings.overwrite,
        ));

        let batch_interactor = Arc::new(BatchInteractor::new(
            Arc::clone(&edit_interactor),
            Arc::clone(&fs_port),
            Arc::clone(&log_port),
        ));

        let inspect_interactor = Arc::new(InspectInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&fs_port),
            Arc::clone(&log_port),
        ));

        Self {
            edit_interactor,
            batch_interactor,
            inspect_interactor,
            fs_port,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

impl AppContainer for DefaultAppContainer {
    fn edit_interactor(&self) -> Arc<EditInteractor> {
        Arc::clone(&self.edit_interactor)
    }

    fn batch_interactor(&self) -> Arc<BatchInteractor> {
        Arc::clone(&self.batch_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn fs_port(&self) -> Arc<dyn FsPort> {
        Arc::clone(&self.fs_port)
    }

    fn overwrite_policy(&self) -> OverwritePolicy {
        self.settings.overwrite
    }

    fn new_workspace(&self) -> Result<IntermediateWorkspace, DomainError> {
        match &self.settings.work_dir {
            Some(dir) => IntermediateWorkspace::new_in(dir),
            None => IntermediateWorkspace::new(),
        }
    }
}
