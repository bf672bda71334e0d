//! Writes `metadata.toml`, recording which catalog was costed, by which build and where.
use anyhow::Result;
use chrono::Local;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output file name for metadata
const METADATA_FILE_NAME: &str = "metadata.toml";

/// Build information generated by the build script
mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// The short git hash of this build, marked if the tree was dirty
fn get_git_hash() -> String {
    match (built_info::GIT_COMMIT_HASH_SHORT, built_info::GIT_DIRTY) {
        (Some(hash), Some(true)) => format!("{hash}-dirty"),
        (Some(hash), _) => hash.to_string(),
        (None, _) => "unknown".to_string(),
    }
}

#[derive(Serialize)]
struct Metadata<'a> {
    run: RunMetadata<'a>,
    program: ProgramMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    platform: Option<PlatformMetadata>,
}

/// Information about this costing run
#[derive(Serialize)]
struct RunMetadata<'a> {
    /// Folder the catalog was read from
    catalog_path: &'a Path,
    /// When the run started
    datetime: String,
}

/// Information about the program build
#[derive(Serialize)]
struct ProgramMetadata {
    name: &'static str,
    version: &'static str,
    target: &'static str,
    is_debug: bool,
    rustc_version: &'static str,
    build_time_utc: &'static str,
    git_commit_hash: String,
}

impl ProgramMetadata {
    fn new() -> Self {
        Self {
            name: built_info::PKG_NAME,
            version: built_info::PKG_VERSION,
            target: built_info::TARGET,
            is_debug: built_info::DEBUG,
            rustc_version: built_info::RUSTC_VERSION,
            build_time_utc: built_info::BUILT_TIME_UTC,
            git_commit_hash: get_git_hash(),
        }
    }
}

/// The machine the program is running on, as reported by [`PlatformInfo`]
#[derive(Serialize)]
struct PlatformMetadata {
    sysname: String,
    release: String,
    machine: String,
    osname: String,
}

impl PlatformMetadata {
    /// Query the platform, returning `None` if it cannot be determined
    fn new() -> Option<Self> {
        let info = PlatformInfo::new().ok()?;
        Some(Self {
            sysname: info.sysname().to_string_lossy().into(),
            release: info.release().to_string_lossy().into(),
            machine: info.machine().to_string_lossy().into(),
            osname: info.osname().to_string_lossy().into(),
        })
    }
}

/// Write metadata for a run on the catalog at `catalog_path` into `output_path`
pub fn write_metadata(output_path: &Path, catalog_path: &Path) -> Result<()> {
    let metadata = Metadata {
        run: RunMetadata {
            catalog_path,
            datetime: Local::now().to_rfc2822(),
        },
        program: ProgramMetadata::new(),
        platform: PlatformMetadata::new(),
    };
    fs::write(
        output_path.join(METADATA_FILE_NAME),
        toml::to_string(&metadata)?,
    )?;

    Ok(())
}
