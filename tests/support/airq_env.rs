use std::{
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Points `AIRQ_CONFIG_HOME` at a test directory until dropped.
pub struct AirqEnvGuard {
    previous: Option<String>,
    _lock: std::sync::MutexGuard<'static, ()>,
}

impl AirqEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous = std::env::var("AIRQ_CONFIG_HOME").ok();
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var("AIRQ_CONFIG_HOME", path);
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for AirqEnvGuard {
    fn drop(&mut self) {
        if let Some(value) = self.previous.take() {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                std::env::set_var("AIRQ_CONFIG_HOME", value);
            }
        } else {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                std::env::remove_var("AIRQ_CONFIG_HOME");
            }
        }
    }
}

const HEADER: &str = "Country,City,AQI Value,AQI Category,CO AQI Value,CO AQI Category,\
Ozone AQI Value,Ozone AQI Category,NO2 AQI Value,NO2 AQI Category,PM2.5 AQI Value,PM2.5 AQI Category";

fn category(aqi: u32) -> &'static str {
    match aqi {
        0..=50 => "Good",
        51..=100 => "Moderate",
        101..=150 => "Unhealthy for Sensitive Groups",
        _ => "Unhealthy",
    }
}

fn row(country: &str, city: &str, co: u32, ozone: u32, no2: u32, pm25: u32) -> String {
    let aqi = co.max(ozone).max(no2).max(pm25);
    format!(
        "{country},{city},{aqi},{},{co},{},{ozone},{},{no2},{},{pm25},{}",
        category(aqi),
        category(co),
        category(ozone),
        category(no2),
        category(pm25),
    )
}

/// Write a synthetic pollution CSV with a few named cities and many filler rows.
pub fn write_dataset(dir: &Path) -> PathBuf {
    let mut lines = vec![HEADER.to_string()];
    lines.push(row("France", "Paris", 1, 30, 5, 42));
    lines.push(row("United States of America", "Paris", 2, 45, 10, 88));
    lines.push(row("India", "Delhi", 3, 40, 12, 180));
    lines.push(row("India", "Mumbai", 2, 35, 8, 130));
    lines.push(row("", "Orphan Town", 1, 20, 1, 300));
    lines.push(",,,,,,,,,,,".to_string());
    for i in 0..200u32 {
        let country = if i % 2 == 0 { "Cleanland" } else { "Smogland" };
        let pm25 = if i % 2 == 0 { i % 95 } else { 110 + i % 150 };
        let ozone = (i * 7) % 60;
        lines.push(row(country, &format!("Town {i}"), i % 3, ozone, i % 20, pm25));
    }
    let path = dir.join("global_air_pollution_dataset.csv");
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}
