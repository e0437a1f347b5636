pub const INSERT_INCIDENT: &str = r#"
INSERT INTO incidents (id, title, description, latitude, longitude, radius, is_active, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9);
"#;

pub const SELECT_INCIDENT_BY_ID: &str = r#"
SELECT id, title, description, latitude, longitude, radius, is_active, created_at, updated_at
FROM incidents
WHERE id = $1;
"#;

pub const SELECT_INCIDENTS_PAGE: &str = r#"
SELECT id, title, description, latitude, longitude, radius, is_active, created_at, updated_at
FROM incidents
ORDER BY created_at DESC
LIMIT $1 OFFSET $2;
"#;

pub const SELECT_ACTIVE_INCIDENTS: &str = r#"
SELECT id, title, description, latitude, longitude, radius, is_active, created_at, updated_at
FROM incidents
WHERE is_active = true
ORDER BY created_at DESC;
"#;

pub const UPDATE_INCIDENT: &str = r#"
UPDATE incidents
SET title = $1,
    description = $2,
    latitude = $3,
    longitude = $4,
    radius = $5,
    is_active = $6,
    updated_at = $7
WHERE id = $8;
"#;

pub const SOFT_DELETE_INCIDENT: &str = r#"
UPDATE incidents SET is_active = false, updated_at = $1 WHERE id = $2;
"#;

pub const SELECT_INCIDENT_STATS: &str = r#"
SELECT i.id AS zone_id,
       COUNT(DISTINCT lc.user_id) AS user_count
FROM incidents i
LEFT JOIN location_check_incidents lci ON i.id = lci.incident_id
LEFT JOIN location_checks lc ON lci.location_check_id = lc.id
    AND lc.checked_at >= $1
WHERE i.is_active = true
GROUP BY i.id
ORDER BY user_count DESC;
"#;

pub const INSERT_LOCATION_CHECK: &str = r#"
INSERT INTO location_checks (id, user_id, latitude, longitude, checked_at, webhook_sent)
VALUES ($1, $2, $3, $4, $5, $6);
"#;

pub const INSERT_CHECK_INCIDENT_LINK: &str = r#"
INSERT INTO location_check_incidents (location_check_id, incident_id)
VALUES ($1, $2)
ON CONFLICT DO NOTHING;
"#;
