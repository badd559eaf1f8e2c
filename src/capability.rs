//! Capability probe: which optional engines this process can use.
//!
//! An engine is *available* when its Cargo feature compiled it in.  The
//! detected set is computed once per process and never changes afterwards.
//! Callers may derive a narrower set (to force a fallback, or to simulate a
//! missing engine in tests) and hand it to the dispatcher; an engine that was
//! not compiled in can never be switched on at runtime.

use std::fmt;
use std::sync::OnceLock;

// ── Engine ───────────────────────────────────────────────────────────────────

/// Optional conversion engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
    Tabular,
    Yaml,
    Pdf,
    PdfWriter,
    Docx,
    Image,
}

impl Engine {
    pub const ALL: [Engine; 6] = [
        Engine::Tabular,
        Engine::Yaml,
        Engine::Pdf,
        Engine::PdfWriter,
        Engine::Docx,
        Engine::Image,
    ];

    /// Capability name, as accepted by `--disable`.
    pub fn name(self) -> &'static str {
        match self {
            Engine::Tabular   => "tabular-engine",
            Engine::Yaml      => "yaml-engine",
            Engine::Pdf       => "pdf-engine",
            Engine::PdfWriter => "pdf-writer-engine",
            Engine::Docx      => "docx-engine",
            Engine::Image     => "image-engine",
        }
    }

    /// Cargo feature that compiles the engine in.
    pub fn feature(self) -> &'static str {
        match self {
            Engine::Tabular   => "tabular",
            Engine::Yaml      => "yaml",
            Engine::Pdf       => "pdf",
            Engine::PdfWriter => "pdf-writer",
            Engine::Docx      => "docx",
            Engine::Image     => "image",
        }
    }

    /// Crates backing the engine (diagnostics only).
    pub fn crates(self) -> &'static str {
        match self {
            Engine::Tabular   => "csv, calamine, rust_xlsxwriter",
            Engine::Yaml      => "serde_yaml",
            Engine::Pdf       => "lopdf",
            Engine::PdfWriter => "printpdf",
            Engine::Docx      => "docx-rs",
            Engine::Image     => "image",
        }
    }

    /// Parse a capability name.  The bare feature name is accepted too.
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.to_ascii_lowercase();
        Engine::ALL
            .into_iter()
            .find(|e| e.name() == s || e.feature() == s)
    }

    fn bit(self) -> u8 {
        match self {
            Engine::Tabular   => 1 << 0,
            Engine::Yaml      => 1 << 1,
            Engine::Pdf       => 1 << 2,
            Engine::PdfWriter => 1 << 3,
            Engine::Docx      => 1 << 4,
            Engine::Image     => 1 << 5,
        }
    }

    /// Was this engine compiled into the binary?
    pub fn compiled_in(self) -> bool {
        match self {
            Engine::Tabular   => cfg!(feature = "tabular"),
            Engine::Yaml      => cfg!(feature = "yaml"),
            Engine::Pdf       => cfg!(feature = "pdf"),
            Engine::PdfWriter => cfg!(feature = "pdf-writer"),
            Engine::Docx      => cfg!(feature = "docx"),
            Engine::Image     => cfg!(feature = "image"),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Capabilities ─────────────────────────────────────────────────────────────

/// Immutable set of available engines.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Capabilities(u8);

static DETECTED: OnceLock<Capabilities> = OnceLock::new();

impl Capabilities {
    /// The process-wide set: every compiled-in engine.  Probed on first use.
    pub fn detected() -> &'static Capabilities {
        DETECTED.get_or_init(|| {
            let caps = Engine::ALL
                .into_iter()
                .filter(|e| e.compiled_in())
                .fold(Capabilities::none(), |caps, e| Capabilities(caps.0 | e.bit()));
            tracing::debug!(?caps, "probed engine capabilities");
            caps
        })
    }

    /// No optional engine at all; only built-in fallbacks remain.
    pub fn none() -> Self {
        Capabilities(0)
    }

    /// Enable or disable one engine.  Enabling is a no-op for an engine that
    /// is not compiled in.
    pub fn with(self, engine: Engine, enabled: bool) -> Self {
        if enabled && engine.compiled_in() {
            Capabilities(self.0 | engine.bit())
        } else if enabled {
            self
        } else {
            Capabilities(self.0 & !engine.bit())
        }
    }

    pub fn without(self, engine: Engine) -> Self {
        self.with(engine, false)
    }

    pub fn has(&self, engine: Engine) -> bool {
        self.0 & engine.bit() != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Engine> + '_ {
        Engine::ALL.into_iter().filter(move |e| self.has(*e))
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        *Capabilities::detected()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(Engine::name)).finish()
    }
}
