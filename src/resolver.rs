//! Tile resolver: selects the prediction rasters of one country and period.

use crate::error::ServeError;
use crate::tile_name::TileNameConvention;
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of the prediction rasters.
const TILE_EXTENSION: &str = "tif";

/// Resolve the tiles under `base_dir/year/month/` that belong to a country,
/// using the default naming convention.
pub fn resolve<P: AsRef<Path>>(
    base_dir: P,
    year: i32,
    month: u32,
    country_tile_ids: &BTreeSet<String>,
) -> Result<Vec<PathBuf>, ServeError> {
    resolve_with(
        &TileNameConvention::default(),
        base_dir,
        year,
        month,
        country_tile_ids,
    )
}

/// Resolve with an explicit naming convention.
///
/// Files are returned in directory enumeration order. A filename that does
/// not follow the convention aborts the whole resolution.
pub fn resolve_with<P: AsRef<Path>>(
    convention: &TileNameConvention,
    base_dir: P,
    year: i32,
    month: u32,
    country_tile_ids: &BTreeSet<String>,
) -> Result<Vec<PathBuf>, ServeError> {
    let base_dir = base_dir.as_ref();
    if !base_dir.is_dir() {
        return Err(ServeError::InvalidInput(format!(
            "Tile directory {} does not exist",
            base_dir.display()
        )));
    }

    let period_dir = base_dir.join(year.to_string()).join(month.to_string());
    if !period_dir.is_dir() {
        return Err(ServeError::InvalidInput(format!(
            "No prediction directory for {}/{} under {}",
            year,
            month,
            base_dir.display()
        )));
    }

    let candidates = list_tile_files(&period_dir)?;
    let candidate_count = candidates.len();

    let mut matched = Vec::new();
    for path in candidates {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ServeError::InvalidInput(format!("Non UTF-8 filename: {}", path.display()))
            })?;

        let tile_id = convention.tile_id(filename)?;
        if country_tile_ids.contains(tile_id) {
            matched.push(path);
        }
    }

    debug!(
        dir = %period_dir.display(),
        candidates = candidate_count,
        matched = matched.len(),
        "Resolved tiles"
    );

    if matched.is_empty() {
        return Err(ServeError::NoMatchingTiles { year, month });
    }

    Ok(matched)
}

/// Non-hidden `*.tif` files directly inside `dir`, in enumeration order.
fn list_tile_files(dir: &Path) -> Result<Vec<PathBuf>, ServeError> {
    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .standard_filters(false)
        .hidden(true)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            ServeError::InvalidInput(format!("Cannot list {}: {}", dir.display(), e))
        })?;
        if entry.depth() == 0 {
            continue;
        }

        let path = entry.into_path();
        if path.extension().is_some_and(|ext| ext == TILE_EXTENSION) && path.is_file() {
            files.push(path);
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tile_ids(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn period_dir(files: &[&str]) -> TempDir {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("2016").join("3");
        fs::create_dir_all(&dir).unwrap();
        for name in files {
            fs::write(dir.join(name), b"").unwrap();
        }
        base
    }

    #[test]
    fn test_single_match() {
        let base = period_dir(&["A_B_C_D_T34NGL_E.tif"]);
        let paths = resolve(base.path(), 2016, 3, &tile_ids(&["34NGL"])).unwrap();
        assert_eq!(paths, vec![base.path().join("2016/3/A_B_C_D_T34NGL_E.tif")]);
    }

    #[test]
    fn test_no_match() {
        let base = period_dir(&["A_B_C_D_T34NGL_E.tif"]);
        let err = resolve(base.path(), 2016, 3, &tile_ids(&["35NGL"])).unwrap_err();
        assert!(matches!(err, ServeError::NoMatchingTiles { year: 2016, month: 3 }));
    }

    #[test]
    fn test_empty_tile_set() {
        let base = period_dir(&["A_B_C_D_T34NGL_E.tif"]);
        let err = resolve(base.path(), 2016, 3, &BTreeSet::new()).unwrap_err();
        assert_eq!(err.kind(), "no_matching_tiles");
    }

    #[test]
    fn test_empty_directory() {
        let base = period_dir(&[]);
        let err = resolve(base.path(), 2016, 3, &tile_ids(&["34NGL"])).unwrap_err();
        assert!(matches!(err, ServeError::NoMatchingTiles { .. }));
    }

    #[test]
    fn test_filters_to_country_tiles() {
        let base = period_dir(&[
            "HLS_L30_2016_03_T38RLQ_pred.tif",
            "HLS_L30_2016_03_T39RUP_pred.tif",
            "HLS_L30_2016_03_T31SDA_pred.tif",
            "HLS_S30_2016_03_T39RVP_pred.tif",
        ]);
        let wanted = tile_ids(&["39RUP", "39RVP", "40RBN"]);
        let paths = resolve(base.path(), 2016, 3, &wanted).unwrap();

        let mut names: Vec<_> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec!["HLS_L30_2016_03_T39RUP_pred.tif", "HLS_S30_2016_03_T39RVP_pred.tif"]
        );
    }

    #[test]
    fn test_preserves_enumeration_order() {
        let names = [
            "a_b_c_d_T07GGG_e.tif",
            "a_b_c_d_T01AAA_e.tif",
            "a_b_c_d_T05EEE_e.tif",
            "a_b_c_d_T03CCC_e.tif",
            "a_b_c_d_T08HHH_e.tif",
            "a_b_c_d_T02BBB_e.tif",
            "a_b_c_d_T06FFF_e.tif",
            "a_b_c_d_T04DDD_e.tif",
            "a_b_c_d_T01AAA_e.png",
            "notes.txt",
        ];
        let base = period_dir(&names);
        let wanted = tile_ids(&["01AAA", "02BBB", "03CCC", "04DDD", "06FFF", "08HHH"]);
        let convention = TileNameConvention::default();

        let listed: Vec<PathBuf> = fs::read_dir(base.path().join("2016").join("3"))
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "tif"))
            .filter(|p| {
                let name = p.file_name().unwrap().to_str().unwrap();
                wanted.contains(convention.tile_id(name).unwrap())
            })
            .collect();

        let resolved = resolve(base.path(), 2016, 3, &wanted).unwrap();
        assert_eq!(resolved.len(), 6);
        assert_eq!(resolved, listed);
    }

    #[test]
    fn test_ignores_other_files() {
        let base = period_dir(&[
            "A_B_C_D_T34NGL_E.tif",
            "A_B_C_D_T34NGL_E.png",
            "A_B_C_D_T34NGL_E.tif.aux.xml",
            ".A_B_C_D_T34NGL_E.tif",
            "README",
        ]);
        fs::create_dir(base.path().join("2016/3/nested_b_c_d_T34NGL_e.tif")).unwrap();

        let paths = resolve(base.path(), 2016, 3, &tile_ids(&["34NGL"])).unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("A_B_C_D_T34NGL_E.tif"));
    }

    #[test]
    fn test_does_not_recurse() {
        let base = period_dir(&[]);
        let nested = base.path().join("2016/3/extra");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("A_B_C_D_T34NGL_E.tif"), b"").unwrap();

        let err = resolve(base.path(), 2016, 3, &tile_ids(&["34NGL"])).unwrap_err();
        assert!(matches!(err, ServeError::NoMatchingTiles { .. }));
    }

    #[test]
    fn test_month_is_not_zero_padded() {
        let base = tempfile::tempdir().unwrap();
        let padded = base.path().join("2016").join("03");
        fs::create_dir_all(&padded).unwrap();
        fs::write(padded.join("A_B_C_D_T34NGL_E.tif"), b"").unwrap();

        let err = resolve(base.path(), 2016, 3, &tile_ids(&["34NGL"])).unwrap_err();
        assert!(matches!(err, ServeError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_period_directory() {
        let base = period_dir(&["A_B_C_D_T34NGL_E.tif"]);
        let err = resolve(base.path(), 2017, 3, &tile_ids(&["34NGL"])).unwrap_err();
        assert!(matches!(err, ServeError::InvalidInput(_)));
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn test_missing_base_directory() {
        let base = tempfile::tempdir().unwrap();
        let missing = base.path().join("nope");
        let err = resolve(&missing, 2016, 3, &tile_ids(&["34NGL"])).unwrap_err();
        assert!(matches!(err, ServeError::InvalidInput(_)));
    }

    #[test]
    fn test_malformed_filename_aborts() {
        let base = period_dir(&["A_B_C_D_T34NGL_E.tif", "short_name.tif"]);
        let err = resolve(base.path(), 2016, 3, &tile_ids(&["34NGL"])).unwrap_err();
        match err {
            ServeError::InvalidInput(message) => assert!(message.contains("short_name.tif")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_custom_convention() {
        let base = period_dir(&["pred-G12ABC-x.tif", "pred-G99ZZZ-x.tif"]);
        let convention = TileNameConvention {
            delimiter: '-',
            token_index: 1,
            strip_prefix: 'G',
        };
        let paths =
            resolve_with(&convention, base.path(), 2016, 3, &tile_ids(&["12ABC"])).unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("pred-G12ABC-x.tif"));
    }
}
