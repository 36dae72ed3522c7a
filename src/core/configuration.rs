use serde::Deserialize;
use std::{
    fs::{self},
    path::Path,
};
use tokio::{fs::File, io::AsyncReadExt};

#[derive(Deserialize, Clone, Debug)]
pub struct Configuration {
    pub api: ApiConfiguration,
    pub core: CoreConfiguration,
    pub log: LogConfiguration,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiConfiguration {
    pub url: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CoreConfiguration {
    pub data_directory: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LogConfiguration {
    pub level: Option<String>,
    pub retention: Option<usize>,
}

impl Configuration {
    pub fn assert_data_dir_permissions(&self) -> Result<(), &str> {
        let data_dir = self.core.data_directory.to_owned().unwrap_or_default();

        let path = Path::new(&data_dir);

        if !path.try_exists().expect("Access is denied") {
            return Err("data dir does not exist");
        }

        let permissions = fs::metadata(path).expect("cannot read metadata").permissions();

        if permissions.readonly() {
            return Err("data_dir cannot be readonly");
        }

        Ok(())
    }

    pub fn assert_api_url_is_not_empty(&self) -> Result<(), ()> {
        self.api
            .url
            .clone()
            .map_or_else(
                || Err(()),
                |v| match v.trim() {
                    "" => Err(()),
                    _ => Ok(()),
                },
            )
    }

    /// Base URL with a guaranteed trailing slash, ready for path appends.
    pub fn api_url(&self) -> String {
        let url = self.api.url.to_owned().unwrap_or_default();

        if url.ends_with('/') {
            url
        } else {
            format!("{}/", url)
        }
    }
}

pub async fn get_configuration(
    file_path: String,
) -> Result<Configuration, Box<dyn std::error::Error + Send + Sync>> {
    let path = Path::new(&file_path);

    if !path.exists() {
        panic!("Configuration file is missing");
    }

    let mut file = File::open(path).await?;
    let mut buffer = vec![];

    file.read_to_end(&mut buffer).await?;

    let result = String::from_utf8(buffer)?;

    match toml::from_str::<Configuration>(&result) {
        Ok(c) => Ok(c),
        Err(e) => {
            println!("{e:#?}");
            panic!("Configuration file is corrupted");
        }
    }
}
