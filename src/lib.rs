/*============================================================
  Synavera Project: Syn-Syu
  Module: syncompose_core
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Library surface of Syn-Compose: package identifier parsing,
    package-set diffing, compose index scraping and reporting.

  Security / Safety Notes:
    The diffing core (nevra, package_set, correlate, classify)
    is pure and performs no I/O.

  Dependencies:
    See individual modules.

  Operational Scope:
    Consumed by the `syncompose_core` binary and by tooling that
    embeds the classifier directly.

  Revision History:
    2025-11-12 COD  Split library from the binary entry point.
============================================================*/

pub mod classify;
pub mod compose_index;
pub mod config;
pub mod correlate;
pub mod error;
pub mod fetch;
pub mod logger;
pub mod nevra;
pub mod package_set;
pub mod report;
pub mod vercmp;
