use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::{fs, io};

use lazy_static::lazy_static;
use regex::Regex;

use myblog::config::CFG_FILE_NAME;

use crate::decompress::decompress_files;
use crate::BootstrapArgs;

lazy_static! {
    /// Relative `res/...` locations in the sample config
    static ref RES_PATH: Regex = Regex::new(r#"(res)/\w+"#).unwrap();
}

fn get_sample_cfg() -> &'static str {
    include_str!("../../../myblog.toml")
}

fn write_blog_cfg(out_dir: &Path) -> io::Result<()> {
    let file = File::create(out_dir.join(CFG_FILE_NAME))?;
    let mut writer = BufWriter::new(file);

    let sample_cfg = replace_paths(out_dir, get_sample_cfg())?;
    writer.write_all(sample_cfg.as_bytes())?;

    writer.flush()
}

fn replace_paths(prefix: &Path, config_data: &str) -> io::Result<String> {
    let prefix = match prefix.to_str() {
        Some(prefix) => prefix.trim_end_matches('/'),
        None => return Err(io::Error::new(ErrorKind::InvalidInput, format!("Not a valid UTF-8 path: {}", prefix.display()))),
    };

    let result = RES_PATH.replace_all(config_data, |captures: &regex::Captures| {
        let matched = &captures[0];
        format!("{}{}", prefix, &matched[captures[1].len()..])
    });

    Ok(result.to_string())
}

pub fn bootstrap_cmd(args: &BootstrapArgs) -> io::Result<()> {
    let out_path = PathBuf::from(&args.out_dir);
    fs::create_dir_all(&out_path)?;
    let out_path = match fs::canonicalize(&out_path) {
        Ok(path) => path,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error converting path to absolute: {} - {}", &args.out_dir, e))),
    };

    if !out_path.is_dir() {
        return Err(io::Error::new(ErrorKind::InvalidInput, format!("Output path must be a directory: {}", out_path.display())));
    }

    decompress_files(&out_path)?;
    fs::create_dir_all(out_path.join("data"))?;
    write_blog_cfg(&out_path)?;

    println!("Blog created in {}", out_path.display());
    println!("Start it with: myblog --config-path {}", out_path.join(CFG_FILE_NAME).display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use myblog::config::read_config;

    use super::*;

    #[test]
    fn test_sample_cfg() {
        let res = replace_paths(Path::new("/abs/path/"), get_sample_cfg()).unwrap();
        assert!(res.contains(r##"template_dir = "/abs/path/template""##));
        assert!(res.contains(r##"public_dir = "/abs/path/public""##));
        assert!(res.contains(r##"data_file = "/abs/path/data/blog.json""##));
        assert!(!res.contains("res/"));
    }

    #[test]
    fn test_bootstrap_into_new_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let out_dir = tmp.path().join("site");
        bootstrap_cmd(&BootstrapArgs { out_dir: out_dir.to_str().unwrap().to_string() }).unwrap();

        let config = read_config(&out_dir.join(CFG_FILE_NAME)).unwrap();
        assert!(config.paths.template_dir.join("list.tpl").is_file());
        assert!(config.paths.public_dir.join("style.css").is_file());
        assert!(config.paths.data_file.parent().unwrap().is_dir());
    }
}
