//! Translation units: one source file read, assembled, taken through the
//! pipeline and serialized, in a scope of its own below the configuration.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use super::{pipeline, Context};
use crate::config;
use crate::inline;
use crate::language::{Block, ExitCode, TranslationError};
use crate::parsing;
use crate::problem::Problems;
use crate::scope::{install, ScopeId, Scopes};
use crate::script::{Evaluator, Expressions};
use crate::signatures::{self, Kind, Template};

/// Whether a unit becomes a complete page or only the markup of its
/// blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Page,
    Fragment,
}

/// What a translation unit produced.
#[derive(Debug)]
pub struct Outcome {
    pub output: String,
    pub problems: Problems,
    pub code: ExitCode,
}

pub struct Engine {
    scopes: Scopes,
    root: ScopeId,
    config: ScopeId,
    mode: Mode,
    halt: Arc<AtomicBool>,
    evaluator: fn() -> Box<dyn Evaluator>,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    pub fn new() -> Engine {
        let mut scopes = Scopes::new();
        let root = scopes.root("root");
        install(&mut scopes, root);
        let config = scopes.child(root, "config");

        Engine {
            scopes,
            root,
            config,
            mode: Mode::Page,
            halt: Arc::new(AtomicBool::new(false)),
            evaluator: expressions,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Engine {
        self.mode = mode;
        self
    }

    /// Replace the evaluator each unit gets for macros, conditions and
    /// custom signatures.
    pub fn with_evaluator(mut self, evaluator: fn() -> Box<dyn Evaluator>) -> Engine {
        self.evaluator = evaluator;
        self
    }

    /// Set this to have units not yet started skipped.
    pub fn halt_flag(&self) -> Arc<AtomicBool> {
        self.halt
            .clone()
    }

    /// Load a TOML file of definitions into the configuration scope.
    pub fn configure(&mut self, path: &Path) -> Result<(), TranslationError> {
        let definitions = config::load(path)?;
        info!("Loaded {} definitions from {}", definitions.len(), path.display());
        self.scopes
            .define(self.config, "_XilizeConfigFile_", &normalize(path));
        for (key, value) in definitions {
            self.scopes
                .define(self.config, &key, &value);
        }
        Ok(())
    }

    pub fn define(&mut self, key: &str, value: &str) {
        self.scopes
            .define(self.config, key, value);
    }

    pub fn value(&self, key: &str) -> String {
        self.scopes
            .value(self.config, key)
    }

    /// Names of the signatures every unit starts with.
    pub fn signature_names(&self) -> Vec<String> {
        self.scopes
            .signature_names(self.root)
    }

    /// Where a unit's output goes by default: beside the source, with the
    /// input extension replaced by the output one.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        let input = self.value("_InputExtension_");
        let output = self.value("_OutputExtension_");
        match path.extension() {
            Some(extension) if extension == input.as_str() => path.with_extension(output),
            _ => {
                let mut name = path
                    .as_os_str()
                    .to_os_string();
                name.push(".");
                name.push(output);
                PathBuf::from(name)
            }
        }
    }

    pub fn translate_file(&self, path: &Path) -> Result<Outcome, TranslationError> {
        if self
            .halt
            .load(Ordering::SeqCst)
        {
            return Err(TranslationError::Halted);
        }
        let content = parsing::load(path)?;
        Ok(self.translate_str(path, &content))
    }

    /// Translate text as though read from `path`.
    pub fn translate_str(&self, path: &Path, content: &str) -> Outcome {
        let mut scopes = self
            .scopes
            .clone();
        let scope = scopes.child(self.config, &path.to_string_lossy());
        let mut ctx = Context::new(scopes, scope, path, (self.evaluator)());

        info!("Translating {}", path.display());
        let name = path
            .file_name()
            .map(|name| {
                name.to_string_lossy()
                    .to_string()
            })
            .unwrap_or_default();
        ctx.scopes
            .define(ctx.scope, "_FilePathXil_", &normalize(path));
        ctx.scopes
            .define(ctx.scope, "_FileNameXil_", &name);

        let natural = self.mode == Mode::Page && ctx.is_true("_Natural_");
        let mut blocks = Vec::new();
        if natural {
            include(&mut ctx, "commoninc", &mut blocks);
            include(&mut ctx, "headerinc", &mut blocks);
        }
        let start = blocks.len();
        blocks.extend(parsing::read(&mut ctx, content));
        let end = blocks.len();
        if natural {
            include(&mut ctx, "footerinc", &mut blocks);
            label(&mut ctx, &mut blocks[start..end]);
        }

        let mut tree = parsing::assemble(&mut ctx, blocks);
        pipeline::exec(&mut ctx, &mut tree);

        if self.mode == Mode::Page {
            let root = tree.root();
            let prolog = tree.add(scaffold(&ctx, "prolog", Kind::Prolog));
            let epilog = tree.add(scaffold(&ctx, "epilog", Kind::Epilog));
            let mut children = tree
                .take_children(root)
                .unwrap_or_default();
            children.insert(0, prolog);
            children.push(epilog);
            tree.set_children(root, Some(children));
        }

        let output = self.output_path(path);
        let output_path = normalize(&output);
        let output_name = output
            .file_name()
            .map(|name| {
                name.to_string_lossy()
                    .to_string()
            })
            .unwrap_or_default();
        for key in ["_FilePathHtml_", "_FilePathOuput_"] {
            ctx.scopes
                .define(ctx.scope, key, &output_path);
        }
        for key in ["_FileNameHtml_", "_FileNameOutput_"] {
            ctx.scopes
                .define(ctx.scope, key, &output_name);
        }

        pipeline::translate(&mut ctx, &mut tree);
        pipeline::translate_last(&mut ctx, &mut tree);
        let output = pipeline::write(&tree);

        let code = if ctx
            .problems
            .errors()
            > 0
        {
            ExitCode::Error
        } else {
            ExitCode::Okay
        };
        debug!("Translated {} with result {}", path.display(), code);

        Outcome {
            output,
            problems: ctx.problems,
            code,
        }
    }
}

fn expressions() -> Box<dyn Evaluator> {
    Box::new(Expressions::new())
}

/// An absolute path with forward slashes.
fn normalize(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .replace('\\', "/")
}

/// Read the file a key names, if it is defined, appending its blocks.
fn include(ctx: &mut Context, key: &str, blocks: &mut Vec<Block>) {
    if !ctx.is_defined(key) {
        return;
    }
    let name = ctx.value(key);
    let path = signatures::local_path(ctx, name.trim());
    match parsing::read_file(ctx, &path) {
        Ok(included) => blocks.extend(included),
        Err(error) => ctx.error(0, format!("error reading include file: {}", error)),
    }
}

/// The first unsigned block of the file is its label: it defines
/// `_NaturalLabel_` and the title, and is re-signed as a heading.
fn label(ctx: &mut Context, blocks: &mut [Block]) {
    let Some(block) = blocks
        .iter_mut()
        .find(|block| !block.signed && !block.end)
    else {
        return;
    };

    let text = inline::markup(ctx, block.number, &block.text());
    ctx.scopes
        .define(ctx.scope, "_NaturalLabel_", &text);
    ctx.define_default("title", &text);

    let name = ctx.value("_NaturalSig_");
    match ctx.signature(&name) {
        Some(template) => block.signature = template.configure(""),
        None => ctx.warning(
            block.number,
            format!("natural signature {} is not defined", name),
        ),
    }
}

fn scaffold(ctx: &Context, name: &str, kind: Kind) -> Block {
    let template = ctx
        .signature(name)
        .unwrap_or_else(|| Template::new(name, kind));
    let mut block = Block::new(0, template.configure(""));
    block.signed = true;
    block
}
