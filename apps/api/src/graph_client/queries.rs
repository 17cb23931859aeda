// Cypher statements sent to the graph store.
// Labels and relationship types match the taxonomy as it is stored:
// 领域 (domain) -[:包含]-> 一级分类 (category) -[:包含 {weight}]-> 二级分类 (skill).

/// One row per domain: `job_name` plus the collected `{skill, weight, category}` edges.
/// Missing weights come back as 0.0.
pub const DOMAIN_SKILLS_QUERY: &str = "\
MATCH (d:领域)-[:包含]->(c:一级分类)-[r:包含]->(s:二级分类)
RETURN d.name AS job_name,
       collect({
           skill: s.name,
           weight: coalesce(r.weight, 0.0),
           category: c.name
       }) AS skills";

/// Liveness probe.
pub const PING_QUERY: &str = "RETURN 1";
