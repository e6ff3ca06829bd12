//! Accession type and hierarchy-level definitions.

use std::fmt;

/// Hierarchy level of an accession, from least to most specific.
///
/// Sequence archives use project/study/sample/experiment/run chains;
/// expression archives use series/sample/platform/dataset records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HierarchyLevel {
    /// Umbrella project (BioProject and equivalents)
    Project,
    /// Study/submission grouping runs and experiments
    Study,
    /// Biological sample (BioSample and equivalents)
    Sample,
    /// Sequencing experiment (library + platform combination)
    Experiment,
    /// Sequencing run referencing raw read data
    Run,
    /// Expression series (a published set of samples)
    Series,
    /// Measurement platform record
    Platform,
    /// Curated expression dataset
    Dataset,
}

impl HierarchyLevel {
    /// Short lowercase name used as the result subtype.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Study => "study",
            Self::Sample => "sample",
            Self::Experiment => "experiment",
            Self::Run => "run",
            Self::Series => "series",
            Self::Platform => "platform",
            Self::Dataset => "dataset",
        }
    }

    /// Tag attached to validation results for this level.
    ///
    /// Project/study/sample/experiment/run chains use `*_level` tags;
    /// expression record levels tag with their plain name.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Project => "project_level",
            Self::Study => "study_level",
            Self::Sample => "sample_level",
            Self::Experiment => "experiment_level",
            Self::Run => "run_level",
            Self::Series => "series",
            Self::Platform => "platform",
            Self::Dataset => "dataset",
        }
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type of a recognized accession. Immutable, defined at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessionType {
    /// SRA/ENA/DDBJ sequencing run (SRR/ERR/DRR)
    SraRun,
    /// SRA/ENA/DDBJ experiment (SRX/ERX/DRX)
    SraExperiment,
    /// SRA/ENA/DDBJ sample (SRS/ERS/DRS)
    SraSample,
    /// SRA/ENA/DDBJ study (SRP/ERP/DRP)
    SraStudy,
    /// INSDC BioProject (PRJNA/PRJEB/PRJDB)
    BioProject,
    /// INSDC BioSample (SAMN/SAMEA/SAMD)
    BioSample,
    /// GSA archive/study accession (CRA)
    GsaStudy,
    /// GSA experiment (CRX)
    GsaExperiment,
    /// GSA sequencing run (CRR)
    GsaRun,
    /// NGDC BioProject (PRJCA)
    GsaProject,
    /// NGDC BioSample (SAMC)
    GsaSample,
    /// GEO series (GSE)
    GeoSeries,
    /// GEO sample (GSM)
    GeoSample,
    /// GEO platform (GPL)
    GeoPlatform,
    /// GEO curated dataset (GDS)
    GeoDataset,
}

impl AccessionType {
    /// The hierarchy level this type represents.
    #[must_use]
    pub fn level(self) -> HierarchyLevel {
        match self {
            Self::SraRun | Self::GsaRun => HierarchyLevel::Run,
            Self::SraExperiment | Self::GsaExperiment => HierarchyLevel::Experiment,
            Self::SraSample | Self::BioSample | Self::GsaSample | Self::GeoSample => {
                HierarchyLevel::Sample
            }
            Self::SraStudy | Self::GsaStudy => HierarchyLevel::Study,
            Self::BioProject | Self::GsaProject => HierarchyLevel::Project,
            Self::GeoSeries => HierarchyLevel::Series,
            Self::GeoPlatform => HierarchyLevel::Platform,
            Self::GeoDataset => HierarchyLevel::Dataset,
        }
    }

    /// Dataset classification for validation results.
    #[must_use]
    pub fn dataset_type(self) -> &'static str {
        match self {
            Self::GeoSeries | Self::GeoSample | Self::GeoPlatform | Self::GeoDataset => {
                "expression_data"
            }
            _ => "sequence_data",
        }
    }

    /// Result subtype string (the hierarchy level name).
    #[must_use]
    pub fn subtype(self) -> &'static str {
        self.level().name()
    }

    /// True for types that reference downloadable data rather than a
    /// metadata-only record. Drives confidence and tagging decisions.
    #[must_use]
    pub fn is_data_level(self) -> bool {
        matches!(
            self,
            Self::SraRun | Self::GsaRun | Self::GeoSeries | Self::GeoDataset
        )
    }

    /// Ordered ancestor chain for this type, root first, ending at the
    /// type's own level. Used for display and hierarchy tagging.
    #[must_use]
    pub fn hierarchy(self) -> &'static [HierarchyLevel] {
        use HierarchyLevel as H;
        match self {
            Self::SraRun | Self::GsaRun => &[H::Project, H::Study, H::Experiment, H::Run],
            Self::SraExperiment | Self::GsaExperiment => &[H::Project, H::Study, H::Experiment],
            Self::SraSample | Self::BioSample | Self::GsaSample => {
                &[H::Project, H::Study, H::Sample]
            }
            Self::SraStudy | Self::GsaStudy => &[H::Project, H::Study],
            Self::BioProject | Self::GsaProject => &[H::Project],
            Self::GeoSeries => &[H::Series],
            Self::GeoSample => &[H::Series, H::Sample],
            Self::GeoPlatform => &[H::Platform],
            Self::GeoDataset => &[H::Dataset],
        }
    }
}

impl fmt::Display for AccessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
