//! # 子体系总能量提取
//!
//! 零场以及（有限场计算中）每个 `APPLIED FIELD` 之后的 SCF 总能量，
//! 相关计算再加上 MP2 与 CCSD(TQ) 校正得到对应级别的总能量。
//!
//! 行格式为 `<n>-BODY(<簇编号>) <数值>`，按括号切分。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 调用（仅在 `--totals` 时）
//! - 使用 `parsers/cursor.rs`, `models/run.rs`

use super::cursor::Cursor;
use crate::error::Result;
use crate::models::field::{parse_fortran_float, FieldVector};
use crate::models::labels::ClusterId;
use crate::models::run::{LevelTotals, RunRecord, TotalEnergies, TotalLevel};
use std::collections::BTreeMap;

const SCF_ANCHOR: &str = "TOTAL SCF ENERGIES";
const FIELD_SCF_ANCHOR: &str = "FREE ENERGIES";
const MP2_ANCHOR: &str = "MP2 E(2) CORRECTIONS";
const CCSD_TQ_ANCHOR: &str = "CC CORRELATION ENERGY E(  CCSD(TQ))";
const FIELD_MARKER: &str = "APPLIED FIELD";
const ROWS_END: &str = "----------";

/// 读取 `簇编号 → 数值` 行，直到空行、虚线或输入结束
fn read_rows(cursor: &mut Cursor) -> Result<BTreeMap<ClusterId, f64>> {
    let mut rows = BTreeMap::new();
    loop {
        let line = cursor.skip(1);
        if line.is_empty() || line == "\n" || line.contains(ROWS_END) {
            break;
        }
        if !line.contains('(') {
            continue;
        }

        let parts: Vec<&str> = line.split(['(', ')']).collect();
        let cluster = parts.get(1).and_then(|p| p.trim().parse::<u32>().ok());
        let value = parts.get(2).and_then(|p| parse_fortran_float(p.trim()));
        match (cluster, value) {
            (Some(cluster), Some(value)) => {
                rows.insert(ClusterId(cluster), value);
            }
            _ => return Err(cursor.malformed("total energy", &line)),
        }
    }
    Ok(rows)
}

/// 在 SCF 总能量上加校正
fn corrected(scf: &BTreeMap<ClusterId, f64>, corrections: BTreeMap<ClusterId, f64>) -> BTreeMap<ClusterId, f64> {
    corrections
        .into_iter()
        .filter_map(|(cluster, correction)| scf.get(&cluster).map(|e| (cluster, e + correction)))
        .collect()
}

/// 读取一个外场下各级别的总能量
fn read_field_totals(
    cursor: &mut Cursor,
    record: &RunRecord,
    field: &FieldVector,
) -> Result<LevelTotals> {
    let mut totals = LevelTotals::new();

    cursor.require(SCF_ANCHOR)?;
    if field.is_zero() {
        cursor.skip(2);
    } else {
        cursor.require(FIELD_SCF_ANCHOR)?;
        cursor.skip(1);
    }
    let scf = read_rows(cursor)?;

    if record.correlation.is_correlated() {
        cursor.require(MP2_ANCHOR)?;
        cursor.skip(2);
        let mp2 = corrected(&scf, read_rows(cursor)?);
        totals.insert(TotalLevel::Mp2, mp2);
    }

    if record.correlation.has_ccsd_tq() {
        cursor.require(CCSD_TQ_ANCHOR)?;
        cursor.skip(2);
        let ccsd_tq = corrected(&scf, read_rows(cursor)?);
        totals.insert(TotalLevel::CcsdTq, ccsd_tq);
    }

    totals.insert(TotalLevel::Scf, scf);
    Ok(totals)
}

/// 读取全部外场下的总能量
pub fn read_total_energies(cursor: &mut Cursor, record: &RunRecord) -> Result<TotalEnergies> {
    let mut energies = TotalEnergies::default();
    cursor.rewind();

    let baseline = read_field_totals(cursor, record, &FieldVector::ZERO)?;
    *energies.entry(FieldVector::ZERO) = baseline;

    if record.finite_field {
        loop {
            let marker = cursor.find_line(FIELD_MARKER);
            if marker.is_empty() {
                break;
            }
            let field = FieldVector::from_marker_line(&marker)
                .ok_or_else(|| cursor.malformed("applied field", &marker))?;
            let totals = read_field_totals(cursor, record, &field)?;
            *energies.entry(field) = totals;
        }
    }

    Ok(energies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::run::CorrelationLevel;
    use std::path::PathBuf;

    fn record(correlation: CorrelationLevel, finite_field: bool) -> RunRecord {
        RunRecord {
            path: PathBuf::from("t.log"),
            name: "t".into(),
            title: String::new(),
            monomers: 2,
            subsystems: 3,
            correlation,
            many_body: false,
            finite_field,
        }
    }

    const TOTALS: &str = r#"
     TOTAL SCF ENERGIES OF SUBSYSTEMS
     --------------------------------
     SUBSYSTEM           ENERGY
   1-BODY(  1)     -76.010000000
   1-BODY(  2)     -76.020000000
   2-BODY(  3)    -152.040000000

     MP2 E(2) CORRECTIONS
     --------------------
     SUBSYSTEM           E(2)
   1-BODY(  1)      -0.200000000
   1-BODY(  2)      -0.300000000
   2-BODY(  3)      -0.510000000
     --------------------
 APPLIED FIELD (AU) =    0.001000   0.000000   0.000000
     TOTAL SCF ENERGIES OF SUBSYSTEMS
     FREE ENERGIES
     SUBSYSTEM           ENERGY
   1-BODY(  1)     -76.011000000
   1-BODY(  2)     -76.021000000
   2-BODY(  3)    -152.042000000

     MP2 E(2) CORRECTIONS
     --------------------
     SUBSYSTEM           E(2)
   1-BODY(  1)      -0.200000000
   1-BODY(  2)      -0.300000000
   2-BODY(  3)      -0.510000000

"#;

    #[test]
    fn test_scf_and_mp2_totals() {
        let mut cursor = Cursor::new(TOTALS, "t.log");
        let totals = read_total_energies(&mut cursor, &record(CorrelationLevel::Mp2, false)).unwrap();

        assert_eq!(totals.fields.len(), 1);
        let baseline = totals.baseline().unwrap();
        assert_eq!(baseline[&TotalLevel::Scf][&ClusterId(3)], -152.04);
        assert!((baseline[&TotalLevel::Mp2][&ClusterId(1)] - (-76.21)).abs() < 1e-12);
        assert!(!baseline.contains_key(&TotalLevel::CcsdTq));
    }

    const CCSD_TQ: &str = r#"
     CC CORRELATION ENERGY E(  CCSD(TQ))
     -----------------------------------
     SUBSYSTEM           E(CORR)
   1-BODY(  1)      -0.250000000
   1-BODY(  2)      -0.350000000
   2-BODY(  3)      -0.620000000
     -----------------------------------
"#;

    #[test]
    fn test_ccsd_tq_totals() {
        let log = TOTALS.replacen(" APPLIED FIELD", &format!("{CCSD_TQ} APPLIED FIELD"), 1);
        let cc = CorrelationLevel::CoupledCluster("CCSD(TQ)".into());
        let mut cursor = Cursor::new(&log, "t.log");
        let totals = read_total_energies(&mut cursor, &record(cc, false)).unwrap();

        let baseline = totals.baseline().unwrap();
        let levels: Vec<TotalLevel> = baseline.keys().copied().collect();
        assert_eq!(levels, vec![TotalLevel::Scf, TotalLevel::Mp2, TotalLevel::CcsdTq]);

        let expected = [
            (ClusterId(1), -76.01, -0.2, -0.25),
            (ClusterId(2), -76.02, -0.3, -0.35),
            (ClusterId(3), -152.04, -0.51, -0.62),
        ];
        for (cluster, scf, mp2, cc) in expected {
            assert_eq!(baseline[&TotalLevel::Scf][&cluster], scf);
            assert_eq!(baseline[&TotalLevel::Mp2][&cluster], scf + mp2);
            assert_eq!(baseline[&TotalLevel::CcsdTq][&cluster], scf + cc);
        }
    }

    #[test]
    fn test_missing_ccsd_tq_block() {
        let cc = CorrelationLevel::CoupledCluster("CCSD(TQ)".into());
        let mut cursor = Cursor::new(TOTALS, "t.log");
        assert!(read_total_energies(&mut cursor, &record(cc, false)).is_err());

        // 其他耦合簇方法只有 MP2 校正
        let ccsd = CorrelationLevel::CoupledCluster("CCSD(T)".into());
        let mut cursor = Cursor::new(TOTALS, "t.log");
        let totals = read_total_energies(&mut cursor, &record(ccsd, false)).unwrap();
        assert!(!totals.baseline().unwrap().contains_key(&TotalLevel::CcsdTq));
    }

    #[test]
    fn test_field_totals() {
        let mut cursor = Cursor::new(TOTALS, "t.log");
        let totals = read_total_energies(&mut cursor, &record(CorrelationLevel::Mp2, true)).unwrap();

        let field = FieldVector::new(0.001, 0.0, 0.0);
        assert_eq!(totals.fields.len(), 2);
        assert_eq!(totals.fields[1].0, field);
        assert_eq!(totals.fields[1].1[&TotalLevel::Scf][&ClusterId(2)], -76.021);
    }

    #[test]
    fn test_missing_correction_block() {
        let log = TOTALS.replace("MP2 E(2) CORRECTIONS", "MP2 SUMMARY");
        let mut cursor = Cursor::new(&log, "t.log");
        assert!(read_total_energies(&mut cursor, &record(CorrelationLevel::Mp2, false)).is_err());
        let mut cursor = Cursor::new(&log, "t.log");
        assert!(read_total_energies(&mut cursor, &record(CorrelationLevel::None, false)).is_ok());
    }
}
