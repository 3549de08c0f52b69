/// Database row type; maps directly to a `capsules` row.
/// Distinct from keepsake-types' `Capsule` so date parsing stays in one place.
pub struct CapsuleRow {
    pub id: String,
    pub ciphertext: String,
    pub created_at: String,
    pub unlock_at: Option<String>,
    pub sender_name: Option<String>,
    pub recipient_name: Option<String>,
    pub title: Option<String>,
}
