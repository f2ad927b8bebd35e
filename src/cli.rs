//! CLI argument parsing with clap.

use clap::{ArgGroup, Parser};

use crate::model::Engine;

/// Generate images with DALL-E 3 or Stable Diffusion and save them locally.
#[derive(Parser, Debug)]
#[command(name = "genimg", version, about)]
#[command(group(ArgGroup::new("prompt_source").required(true).args(["prompt", "prompt_file"])))]
pub struct Cli {
    /// Generation back end.
    #[arg(long, value_enum)]
    pub engine: Engine,

    /// Text prompt describing the desired image.
    #[arg(long)]
    pub prompt: Option<String>,

    /// Path to a file containing the prompt text.
    #[arg(long)]
    pub prompt_file: Option<String>,

    /// Number of images to generate (one API call each).
    #[arg(long = "n", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,

    /// Aspect ratio for DALL-E: 1:1, 16:9 or 9:16.
    #[arg(long, default_value = "1:1")]
    pub aspect: String,

    /// What the image should not contain (Stable Diffusion only).
    #[arg(long = "negative_prompt", alias = "negative-prompt")]
    pub negative_prompt: Option<String>,

    /// Sampling seed (Stable Diffusion only); 0 means random.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Directory to write images to (defaults to the config value, `pics`).
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve the prompt from either `--prompt` or `--prompt-file`.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt file cannot be read.
    pub fn resolve_prompt(&self) -> Result<String, std::io::Error> {
        if let Some(ref text) = self.prompt {
            Ok(text.clone())
        } else if let Some(ref path) = self.prompt_file {
            Ok(std::fs::read_to_string(path)?.trim().to_string())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Provide --prompt or --prompt-file",
            ))
        }
    }

    /// Flags that the selected engine does not use.
    #[must_use]
    pub fn ignored_flags(&self) -> Vec<&'static str> {
        let mut ignored = Vec::new();
        match self.engine {
            Engine::Dalle => {
                if self.negative_prompt.is_some() {
                    ignored.push("--negative_prompt");
                }
                if self.seed.is_some() {
                    ignored.push("--seed");
                }
            }
            Engine::Stable => {
                if self.aspect != "1:1" {
                    ignored.push("--aspect");
                }
            }
        }
        ignored
    }
}
