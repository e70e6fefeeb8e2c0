use crate::core::{build_scene_geometry, search_for_reference, SceneOptions, SearchConfig};
use crate::io::{list_days, SafeReader};
use crate::types::{BurstFootprint, FootprintTable, SarError};
use pyo3::prelude::*;
use std::path::PathBuf;

fn to_py_err(e: SarError) -> PyErr {
    match &e {
        SarError::InvalidInput(msg) => PyErr::new::<pyo3::exceptions::PyValueError, _>(msg.clone()),
        SarError::ArchiveRead { .. } | SarError::Io(_) => {
            PyErr::new::<pyo3::exceptions::PyIOError, _>(format!("{}", e))
        }
        _ => PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("{}", e)),
    }
}

/// Python module definition
#[pymodule]
fn _core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyFootprintTable>()?;
    m.add_class::<PyBurstFootprint>()?;
    m.add_function(wrap_pyfunction!(py_list_days, m)?)?;
    m.add_function(wrap_pyfunction!(py_create_scene_table, m)?)?;
    m.add_function(wrap_pyfunction!(py_search_for_reference, m)?)?;
    Ok(())
}

/// One table row with every column exposed as a read-only attribute
#[pyclass(name = "BurstFootprint")]
#[derive(Clone, Debug)]
struct PyBurstFootprint {
    #[pyo3(get)]
    subswath: String,
    #[pyo3(get)]
    burst: u32,
    /// Footprint polygon as WKT
    #[pyo3(get)]
    geometry: String,
    #[pyo3(get)]
    id: String,
    #[pyo3(get)]
    name: String,
    #[pyo3(get)]
    path: String,
    #[pyo3(get)]
    sensor: String,
    #[pyo3(get)]
    polarizations: String,
    /// RFC 3339 timestamp
    #[pyo3(get)]
    start: String,
    #[pyo3(get)]
    stop: String,
    #[pyo3(get)]
    mode: String,
    #[pyo3(get)]
    product: String,
    #[pyo3(get)]
    orbit_direction: String,
    #[pyo3(get)]
    rel_orbit: u32,
    /// 1 for the nominal burst pattern, else 0
    #[pyo3(get)]
    regular_burst_pattern: u8,
}

impl From<&BurstFootprint> for PyBurstFootprint {
    fn from(row: &BurstFootprint) -> Self {
        PyBurstFootprint {
            subswath: row.subswath.to_string(),
            burst: row.burst,
            geometry: row.geometry.to_wkt(),
            id: row.id.clone(),
            name: row.name.clone(),
            path: row.path.to_string_lossy().to_string(),
            sensor: row.sensor.clone(),
            polarizations: row.polarizations.clone(),
            start: row.start.to_rfc3339(),
            stop: row.stop.to_rfc3339(),
            mode: row.mode.clone(),
            product: row.product.clone(),
            orbit_direction: row.orbit_direction.to_string(),
            rel_orbit: row.rel_orbit,
            regular_burst_pattern: u8::from(row.regular_burst_pattern),
        }
    }
}

#[pymethods]
impl PyBurstFootprint {
    fn __repr__(&self) -> String {
        format!(
            "BurstFootprint(id={}, subswath={}, burst={})",
            self.id, self.subswath, self.burst
        )
    }
}

/// Python wrapper for FootprintTable
#[pyclass(name = "FootprintTable")]
#[derive(Clone)]
struct PyFootprintTable {
    inner: FootprintTable,
}

#[pymethods]
impl PyFootprintTable {
    #[new]
    fn new() -> Self {
        PyFootprintTable { inner: FootprintTable::default() }
    }

    /// Append the rows of another table, e.g. a freshly processed scene
    fn append(&mut self, other: &PyFootprintTable) {
        self.inner.append(other.inner.clone());
    }

    fn scene_ids(&self) -> Vec<String> {
        self.inner.scene_ids()
    }

    fn bursts(&self) -> Vec<u32> {
        self.inner.burst_sequence()
    }

    fn rows(&self) -> Vec<PyBurstFootprint> {
        self.inner.iter().map(PyBurstFootprint::from).collect()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "FootprintTable(rows={}, scenes={:?})",
            self.inner.len(),
            self.inner.scene_ids()
        )
    }
}

#[pyfunction]
#[pyo3(name = "list_days")]
fn py_list_days(list_of_days: Vec<String>, month_path: String) -> PyResult<Vec<String>> {
    let paths = list_days(list_of_days.as_slice(), &month_path).map_err(to_py_err)?;
    Ok(paths.into_iter().map(|p| p.to_string_lossy().to_string()).collect())
}

#[pyfunction]
#[pyo3(name = "create_scene_table", signature = (path, name = None, id = None, make_regular = false))]
fn py_create_scene_table(
    path: String,
    name: Option<String>,
    id: Option<String>,
    make_regular: bool,
) -> PyResult<PyFootprintTable> {
    let options = SceneOptions { name, id, make_regular };
    let inner = build_scene_geometry(&SafeReader::new(), &PathBuf::from(path), &options)
        .map_err(to_py_err)?;
    Ok(PyFootprintTable { inner })
}

#[pyfunction]
#[pyo3(name = "search_for_reference", signature = (scene, reference, ref_sensor = "S1A".to_string(), epsg = 32631))]
fn py_search_for_reference(
    scene: &PyFootprintTable,
    reference: &PyFootprintTable,
    ref_sensor: String,
    epsg: u32,
) -> PyResult<Vec<String>> {
    let config = SearchConfig {
        ref_sensor,
        epsg,
        ..SearchConfig::default()
    };
    search_for_reference(&scene.inner, &reference.inner, &config).map_err(to_py_err)
}
