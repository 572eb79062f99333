//! Dataset files.
//!
//! A dataset is a directory holding:
//!
//! | File | Header | Rows |
//! |------|--------|------|
//! | `flow.txt` | one ignored line | `id,bandwidth,arrival_time,duration` |
//! | `port.txt` | one ignored line | `id,capacity` |
//! | `result.txt` | none | `flow_id,port_id,start_time` per admitted flow |
//!
//! Numbered datasets live side by side under a root: `root/0`, `root/1`, ...

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::debug;

use crate::error::{Error, Result};
use crate::models::{Flow, Port, Schedule};

/// Flow file name inside a dataset directory.
pub const FLOW_FILE: &str = "flow.txt";
/// Port file name inside a dataset directory.
pub const PORT_FILE: &str = "port.txt";
/// Result file name inside a dataset directory.
pub const RESULT_FILE: &str = "result.txt";

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input)
}

fn writer<W: Write>(output: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(output)
}

/// Reads flows, skipping the header line.
pub fn read_flows<R: Read>(input: R) -> Result<Vec<Flow>> {
    let mut rdr = reader(input);
    let mut flows = Vec::new();
    for record in rdr.records() {
        let (id, bandwidth, arrival_time, duration): (u32, u64, i64, i64) =
            record?.deserialize(None)?;
        flows.push(Flow::new(id, bandwidth, arrival_time, duration));
    }
    Ok(flows)
}

/// Reads ports, skipping the header line.
pub fn read_ports<R: Read>(input: R) -> Result<Vec<Port>> {
    let mut rdr = reader(input);
    let mut ports = Vec::new();
    for record in rdr.records() {
        let (id, capacity): (u32, u64) = record?.deserialize(None)?;
        ports.push(Port::new(id, capacity));
    }
    Ok(ports)
}

/// Writes flows with a header line.
pub fn write_flows<W: Write>(output: W, flows: &[Flow]) -> Result<()> {
    let mut wtr = writer(output);
    wtr.write_record(["flows: id bandwidth arrival_time duration"])?;
    for f in flows {
        wtr.serialize((f.id, f.bandwidth, f.arrival_time, f.duration))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes ports with a header line.
pub fn write_ports<W: Write>(output: W, ports: &[Port]) -> Result<()> {
    let mut wtr = writer(output);
    wtr.write_record(["ports: id capacity"])?;
    for p in ports {
        wtr.serialize((p.id, p.capacity))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes one `flow_id,port_id,start_time` row per assignment, in admission order.
pub fn write_assignments<W: Write>(output: W, schedule: &Schedule) -> Result<()> {
    let mut wtr = writer(output);
    for (flow_id, port_id, start_time) in schedule.trace() {
        wtr.serialize((flow_id, port_id, start_time))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads flows from a file.
pub fn load_flows(path: impl AsRef<Path>) -> Result<Vec<Flow>> {
    read_flows(open(path.as_ref())?)
}

/// Reads ports from a file.
pub fn load_ports(path: impl AsRef<Path>) -> Result<Vec<Port>> {
    read_ports(open(path.as_ref())?)
}

fn open(path: &Path) -> Result<File> {
    if !path.is_file() {
        return Err(Error::MissingDataset(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}

/// One dataset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// Directory holding the dataset files.
    pub dir: PathBuf,
}

impl Dataset {
    /// Dataset rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Numbered datasets under `root`, in order, up to the first number
    /// without a port file.
    pub fn discover(root: impl AsRef<Path>) -> Vec<Dataset> {
        let root = root.as_ref();
        let datasets: Vec<Dataset> = (0..)
            .map(|n: u32| Dataset::new(root.join(n.to_string())))
            .take_while(|d| d.port_path().is_file())
            .collect();
        debug!("found {} datasets under {}", datasets.len(), root.display());
        datasets
    }

    /// Path of the flow file.
    pub fn flow_path(&self) -> PathBuf {
        self.dir.join(FLOW_FILE)
    }

    /// Path of the port file.
    pub fn port_path(&self) -> PathBuf {
        self.dir.join(PORT_FILE)
    }

    /// Path of the result file.
    pub fn result_path(&self) -> PathBuf {
        self.dir.join(RESULT_FILE)
    }

    /// Reads the flows and ports.
    pub fn load(&self) -> Result<(Vec<Flow>, Vec<Port>)> {
        let flows = load_flows(self.flow_path())?;
        let ports = load_ports(self.port_path())?;
        debug!(
            "loaded {}: {} flows, {} ports",
            self.dir.display(),
            flows.len(),
            ports.len()
        );
        Ok((flows, ports))
    }

    /// Writes the flows and ports, creating the directory if needed.
    pub fn save(&self, flows: &[Flow], ports: &[Port]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        write_flows(File::create(self.flow_path())?, flows)?;
        write_ports(File::create(self.port_path())?, ports)?;
        Ok(())
    }

    /// Writes the assignment trace to the result file.
    pub fn write_result(&self, schedule: &Schedule) -> Result<()> {
        write_assignments(File::create(self.result_path())?, schedule)
    }
}
