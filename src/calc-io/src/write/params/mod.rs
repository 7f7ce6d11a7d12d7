use std::fmt::{self, Display, Formatter};

/// `convertf` parameter file: EIGENSTRAT (`.geno`, `.snp`, `.ind`) to PACKEDPED (`.bed`, `.bim`, `.fam`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertfParams {
    prefix: String,
}

impl ConvertfParams {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self{prefix: prefix.into()}
    }

    pub fn lines(&self) -> Vec<String> {
        let prefix = &self.prefix;
        vec![
            format!("genotypename: {prefix}.geno"),
            format!("snpname: {prefix}.snp"),
            format!("indivname: {prefix}.ind"),
            String::from("outputformat: PACKEDPED"),
            format!("genotypeoutname: {prefix}.bed"),
            format!("snpoutname: {prefix}.bim"),
            format!("indivoutname: {prefix}.fam"),
        ]
    }
}

impl Display for ConvertfParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.lines().iter().try_for_each(|line| writeln!(f, "{line}"))
    }
}

/// Parameter file of the resulting calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalcParams {
    calc_name: String,
    k        : usize,
    n_alleles: usize,
}

impl CalcParams {
    /// Tolerance of the estimator, written as-is.
    pub const TOLERANCE: &'static str = "1d-7";
    pub const GENOTYPE_FILE: &'static str = "genotype.txt";

    /// # Arguments
    /// - `calc_name`: calculator name (stem of `.txt`, `.F` and `.alleles` files)
    /// - `k`        : number of components
    /// - `n_alleles`: number of lines within `<calc_name>.alleles`
    pub fn new(calc_name: impl Into<String>, k: usize, n_alleles: usize) -> Self {
        Self{calc_name: calc_name.into(), k, n_alleles}
    }

    pub fn lines(&self) -> Vec<String> {
        let name = &self.calc_name;
        vec![
            Self::TOLERANCE.to_string(),
            self.k.to_string(),
            Self::GENOTYPE_FILE.to_string(),
            self.n_alleles.to_string(),
            format!("{name}.txt"),
            format!("{name}.F"),
            format!("{name}.alleles"),
            String::from("verbose"),
            String::from("genomewide"),
        ]
    }
}

impl Display for CalcParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.lines().iter().try_for_each(|line| writeln!(f, "{line}"))
    }
}
