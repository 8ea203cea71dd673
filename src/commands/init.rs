//! # Matrix Initialization Module / 矩阵初始化模块
//!
//! This module creates a starter `MayaMatrix.toml` through an interactive
//! command-line wizard, or non-interactively with sensible defaults. The
//! file is written atomically so an interrupted init never leaves a
//! half-written configuration behind.
//!
//! 此模块通过交互式命令行向导创建一个初始 `MayaMatrix.toml`，
//! 也可以使用合理的默认值非交互式创建。文件以原子方式写入，
//! 因此被中断的初始化不会留下写了一半的配置。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{Confirm, Input, theme::ColorfulTheme};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::config::MatrixConfig;
use crate::infra::t;

/// Runs the wizard (or the non-interactive default path) to generate a
/// `MayaMatrix.toml` file in the current directory.
pub fn run_init_wizard(language: &str, non_interactive: bool) -> Result<()> {
    let config_path = Path::new("MayaMatrix.toml");
    let theme = ColorfulTheme::default();

    if !non_interactive {
        println!(
            "\n{}",
            t!("init.welcome", locale = language).cyan().bold()
        );
        println!("{}", t!("init.description", locale = language));
    }

    if config_path.exists() && !non_interactive {
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(
                t!(
                    "init.overwrite_prompt",
                    locale = language,
                    path = config_path.display()
                )
                .to_string(),
            )
            .default(false)
            .interact()
            .context(t!("init.prompt_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init.aborted", locale = language));
            return Ok(());
        }
    }

    let default_config = starter_config(language);

    if non_interactive {
        return write_config(config_path, &default_config, language);
    }

    let image: String = Input::with_theme(&theme)
        .with_prompt(t!("init.image_prompt", locale = language).to_string())
        .default(default_config.image.clone())
        .interact_text()
        .context(t!("init.prompt_failed", locale = language).to_string())?;

    let versions_raw: String = Input::with_theme(&theme)
        .with_prompt(t!("init.versions_prompt", locale = language).to_string())
        .default(default_config.versions.join(", "))
        .interact_text()
        .context(t!("init.prompt_failed", locale = language).to_string())?;
    let versions: Vec<String> = versions_raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let timeout_secs: u64 = Input::with_theme(&theme)
        .with_prompt(t!("init.timeout_prompt", locale = language).to_string())
        .default(default_config.timeout_secs)
        .interact_text()
        .context(t!("init.prompt_failed", locale = language).to_string())?;

    let config = MatrixConfig {
        image,
        versions,
        timeout_secs,
        ..default_config
    };

    write_config(config_path, &config, language)
}

/// The starter matrix: the public Maya base images across the currently
/// supported release years.
fn starter_config(language: &str) -> MatrixConfig {
    MatrixConfig {
        language: language.to_string(),
        engine: "docker".to_string(),
        image: "mottosso/mayabase".to_string(),
        versions: vec![
            "2022".to_string(),
            "2023".to_string(),
            "2024".to_string(),
        ],
        workspace: PathBuf::from("."),
        bootstrap: "mayapy -m ensurepip --user".to_string(),
        install: "mayapy -m pip install --user -r requirements-dev.txt".to_string(),
        test_command: "mayapy scripts/run_tests.py".to_string(),
        timeout_secs: 1800,
    }
}

fn write_config(path: &Path, config: &MatrixConfig, language: &str) -> Result<()> {
    let toml_string = toml::to_string_pretty(config)
        .context(t!("init.serialize_failed", locale = language).to_string())?;

    // Stage in the same directory, then move into place.
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut staged = tempfile::NamedTempFile::new_in(dir)
        .context(t!("init.write_failed", locale = language, path = path.display()).to_string())?;
    staged
        .write_all(toml_string.as_bytes())
        .context(t!("init.write_failed", locale = language, path = path.display()).to_string())?;
    staged
        .persist(path)
        .with_context(|| t!("init.write_failed", locale = language, path = path.display()).to_string())?;

    println!(
        "\n{} {}",
        "✔".green(),
        t!("init.created", locale = language, path = path.display()).bold()
    );
    println!("{}", t!("init.usage_hint", locale = language));

    Ok(())
}
