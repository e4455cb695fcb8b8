use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "metaguard",
    about = "Analiza, evalúa riesgos y sanea la metadata de imágenes, PDF y documentos Office",
    version
)]
pub struct Cli {
    /// Muestra también los mensajes de depuración
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Solo muestra errores
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Sin subcomando se abre el menú interactivo
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extrae la metadata, calcula hashes y evalúa riesgos
    Analyze {
        path: PathBuf,

        /// Imprime el informe en JSON
        #[arg(long)]
        json: bool,

        /// Omite el cálculo de MD5/SHA-256
        #[arg(long)]
        no_hash: bool,
    },

    /// Comprueba que la extensión coincide con el contenido real
    VerifyExt { path: PathBuf },

    /// Genera una copia sin metadata
    Wipe {
        path: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Genera una copia con metadata genérica
    Default {
        path: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Genera una copia con los pares clave=valor indicados
    Custom {
        path: PathBuf,

        /// Pares `clave=valor` separados por comas; puede repetirse
        #[arg(long = "set", required = true)]
        set: Vec<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    /// Filtro de `env_logger` cuando `RUST_LOG` no está definido.
    pub fn default_log_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}
