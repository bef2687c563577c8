//! X12 005010X222A1 837P skeleton builder.
//!
//! Lays out the proper loop/segment structure with safe placeholders where
//! claim data is incomplete; not a certified implementation.

use chrono::{DateTime, Utc};
use claimfix_types::claim::Claim;
use claimfix_types::coverage::{Coverage, Patient};
use rust_decimal::Decimal;

const SENDER_ID: &str = "SENDERID";
const RECEIVER_ID: &str = "RECEIVERID";

fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

fn non_blank(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build the 837P segment list for a claim.
///
/// `now` stamps the interchange and service dates; the caller supplies it so
/// file content is reproducible under test.
pub fn build_837p(
    claim: &Claim,
    patient: &Patient,
    coverage: Option<&Coverage>,
    now: DateTime<Utc>,
) -> Vec<String> {
    let ymd = now.format("%Y%m%d").to_string();
    let hms = now.format("%H%M").to_string();
    let control = "0001";

    let mut segs: Vec<String> = Vec::new();

    segs.push(format!(
        "ISA*00*          *00*          *ZZ*{SENDER_ID:<15}*ZZ*{RECEIVER_ID:<15}*{}*{}*^*00501*000000905*0*T*:~",
        &ymd[2..],
        hms
    ));
    segs.push(format!(
        "GS*HC*{SENDER_ID}*{RECEIVER_ID}*{ymd}*{hms}*1*X*005010X222A1~"
    ));
    segs.push(format!("ST*837*{control}*005010X222A1~"));
    segs.push(format!("BHT*0019*00*{control}*{ymd}*{hms}*CH~"));

    // 1000A submitter / 1000B receiver
    segs.push("NM1*41*2*Demo Submitter*****46*123456789~".to_string());
    segs.push("PER*IC*SUBMITTER CONTACT*TE*5551231234*EM*submitter@example.com~".to_string());
    segs.push(format!("NM1*40*2*{RECEIVER_ID}*****46*RECEIVER~"));

    // 2000A billing provider
    segs.push("HL*1**20*1~".to_string());
    segs.push("PRV*BI*PXC*207Q00000X~".to_string());
    segs.push("NM1*85*2*Sample Clinic*****XX*1234567890~".to_string());
    segs.push("N3*100 Medical Way~".to_string());
    segs.push("N4*Chicago*IL*60601~".to_string());
    segs.push("REF*EI*123456789~".to_string());

    // 2000B subscriber
    segs.push("HL*2*1*22*0~".to_string());
    segs.push("SBR*P*18*******MC~".to_string());

    let last = non_blank(&patient.last_name, "DOE");
    let first = non_blank(&patient.first_name, "JOHN");
    let dob = patient
        .date_of_birth
        .map(|d| d.format("%Y%m%d").to_string())
        .unwrap_or_else(|| "19800101".to_string());
    let member_id = coverage
        .map(|c| non_blank(&c.member_id, "MEMBERID"))
        .unwrap_or_else(|| "MEMBERID".to_string());
    segs.push(format!("NM1*IL*1*{last}*{first}****MI*{member_id}~"));
    segs.push("N3*1 MAIN ST~".to_string());
    segs.push("N4*CHICAGO*IL*60601~".to_string());
    segs.push(format!("DMG*D8*{dob}*U~"));

    // 2010BB payer
    let payer = non_blank(&claim.payer_name, "PAYER");
    segs.push(format!("NM1*PR*2*{payer}*****PI*PAYERID~"));

    // 2300 claim
    let pos = non_blank(&claim.pos, "11");
    segs.push(format!(
        "CLM*{}*{}***{}:11*Y*A*Y*I~",
        claim.id,
        money(claim.total_charge),
        pos
    ));
    segs.push(format!("REF*D9*{}~", claim.id));

    // 2300 HI diagnoses, primary first, max 12
    let mut ordered: Vec<_> = claim.diagnoses.iter().collect();
    ordered.sort_by_key(|d| d.order);
    let parts: Vec<String> = ordered
        .iter()
        .take(12)
        .enumerate()
        .map(|(i, d)| {
            let flat = d.code.replace('.', "");
            let qual = if i == 0 { "ABK" } else { "ABF" };
            format!("{qual}:{flat}")
        })
        .collect();
    if !parts.is_empty() {
        segs.push(format!("HI*{}~", parts.join("*")));
    }

    // 2400 service lines
    for (i, line) in claim.lines.iter().enumerate() {
        segs.push(format!("LX*{}~", i + 1));
        segs.push(format!(
            "SV1*HC:{}*{}*UN*{}***1~",
            non_blank(&line.cpt, "99213"),
            money(line.charge),
            line.units
        ));
        segs.push(format!("DTP*472*D8*{ymd}~"));
    }

    // SE count spans ST..SE inclusive.
    let st_idx = segs
        .iter()
        .position(|s| s.starts_with("ST*"))
        .unwrap_or(0);
    let se_count = (segs.len() - st_idx) + 1;
    segs.push(format!("SE*{se_count}*{control}~"));
    segs.push("GE*1*1~".to_string());
    segs.push("IEA*1*000000905~".to_string());
    segs
}

/// Join segments into the file body.
pub fn render_segments(segs: &[String]) -> String {
    segs.join("\n")
}
