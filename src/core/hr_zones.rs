use crate::utils::error::{Result, SpmError};
use serde::Serialize;

pub const ZONE_LABELS: [&str; 5] = [
    "Zone 1 (Recovery)",
    "Zone 2 (Light Aerobic)",
    "Zone 3 (Aerobic)",
    "Zone 4 (Anaerobic Threshold)",
    "Zone 5 (Maximum Effort)",
];

// 儲備心率百分比（以十分之一為單位）
const ZONE_TENTHS: [u32; 5] = [5, 6, 7, 8, 9];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeartRateZone {
    pub label: &'static str,
    pub bpm: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeartRateZones {
    pub zones: Vec<HeartRateZone>,
    pub max_hr: u32,
    pub resting_hr: u32,
}

impl HeartRateZones {
    pub fn bpm(&self, zone: usize) -> Option<u32> {
        self.zones.get(zone.checked_sub(1)?).map(|z| z.bpm)
    }
}

/// 傳統公式 220 - 年齡
pub fn max_heart_rate(age: u32) -> Result<u32> {
    220u32
        .checked_sub(age)
        .filter(|hr| *hr > 0)
        .ok_or_else(|| SpmError::ValidationError {
            message: format!("age {} is out of range", age),
        })
}

/// Karvonen 公式：靜止心率 + 百分比 × (最大心率 - 靜止心率)，小數捨去
pub fn calculate_hr_zones(max_hr: u32, resting_hr: u32) -> Result<HeartRateZones> {
    if max_hr <= resting_hr {
        return Err(SpmError::ValidationError {
            message: format!(
                "max heart rate ({}) must be above resting heart rate ({})",
                max_hr, resting_hr
            ),
        });
    }

    let reserve = max_hr - resting_hr;
    let zones = ZONE_LABELS
        .iter()
        .zip(ZONE_TENTHS)
        .map(|(&label, tenths)| {
            // 以 u64 相乘；結果小於 reserve，轉回 u32 不會截斷
            let offset = u64::from(reserve) * u64::from(tenths) / 10;
            HeartRateZone {
                label,
                bpm: resting_hr + offset as u32,
            }
        })
        .collect();

    Ok(HeartRateZones {
        zones,
        max_hr,
        resting_hr,
    })
}
