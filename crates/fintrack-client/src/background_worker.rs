//! Owns the tokio runtime the request layer spawns onto when running
//! natively. The runtime has to outlive the UI loop or requests still in
//! flight would be dropped mid-way.

pub fn create_runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("unable to build the tokio runtime")
}

/// Moves the runtime onto its own thread and keeps it there for the life of
/// the process so spawned requests always have an executor to run on
pub fn park_runtime(rt: tokio::runtime::Runtime) {
    std::thread::spawn(move || {
        tracing::info!("Request runtime thread started");
        rt.block_on(futures::future::pending::<()>())
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_builds_and_drives_futures() {
        // Arrange
        let rt = create_runtime();

        // Act
        let actual = rt.block_on(async { 1 + 1 });

        // Assert
        assert_eq!(actual, 2);
    }
}
