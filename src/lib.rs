//! # nat2dose - NAT2 Genotype Lookup for Isoniazid Therapy
//!
//! Given the observed alleles at six NAT2 marker positions, determines the
//! diplotype, the acetylator phenotype (Fast/Intermediate/Slow), its
//! population frequency and the matching isoniazid dosing guidance.
//!
//! ## Architecture
//!
//! - `allele`: Marker positions, the allele alphabet and observed call sets
//! - `reference`: Built-in diplotype and dosing tables
//! - `resolver`: Exact first-match genotype resolution and dosing lookup
//! - `calls`: Call file parsing
//! - `report`: Plain-text output for CLI mode
//! - `logging`: `tracing` subscriber setup
//! - `model`, `event`, `ui`, `controller`: the interactive terminal interface
//!
//! ## Example
//!
//! ```
//! use nat2dose::allele::ObservedAlleles;
//! use nat2dose::resolver::resolve_genotype;
//!
//! let observed: ObservedAlleles = "282=T,590=A".parse().unwrap();
//! let call = resolve_genotype(&observed);
//! assert_eq!(call.as_tuple(), ("NAT2*6/*6", "Slow", 15.8));
//! assert_eq!(call.recommendation().dose, "2.5-4 mg/kg/day");
//! ```

pub mod allele;
pub mod calls;
pub mod controller;
pub mod event;
pub mod logging;
pub mod model;
pub mod reference;
pub mod report;
pub mod resolver;
pub mod ui;
