//! Default job catalog. Used to seed an empty catalog at startup and by
//! the admin reset-to-defaults operation.

use crate::jobs::store::NewJob;
use crate::models::job::EmploymentType;

fn job(
    title: &str,
    company: &str,
    location: &str,
    job_type: EmploymentType,
    description: &str,
    requirements: &[&str],
    salary_range: &str,
) -> NewJob {
    NewJob {
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        job_type,
        description: description.to_string(),
        requirements: requirements.iter().map(|s| s.to_string()).collect(),
        salary_range: Some(salary_range.to_string()),
    }
}

/// The five default postings, in display order (first is listed first).
pub fn default_jobs() -> Vec<NewJob> {
    vec![
        job(
            "Senior Frontend Engineer",
            "TechFlow Solutions",
            "San Francisco, CA (Remote)",
            EmploymentType::FullTime,
            "Looking for a React expert with TypeScript and Tailwind experience to lead our UI team.",
            &["React", "TypeScript", "Tailwind CSS", "5+ years experience", "State Management"],
            "$140k - $180k",
        ),
        job(
            "Data Analyst",
            "Metrics Inc.",
            "New York, NY",
            EmploymentType::Hybrid,
            "Analyze complex datasets to drive business insights using SQL and Python.",
            &["SQL", "Python", "Tableau", "Data Visualization", "Communication"],
            "$90k - $120k",
        ),
        job(
            "Product Manager",
            "InnovateCreate",
            "Austin, TX",
            EmploymentType::FullTime,
            "Lead the product lifecycle from concept to launch for our SaaS platform.",
            &["Product Strategy", "Agile", "JIRA", "User Research", "Roadmapping"],
            "$130k - $160k",
        ),
        job(
            "Junior Backend Developer",
            "CloudSystems",
            "Remote",
            EmploymentType::Contract,
            "Support backend API development using Node.js and Express.",
            &["Node.js", "Express", "MongoDB", "REST APIs", "Git"],
            "$70k - $90k",
        ),
        job(
            "UX/UI Designer",
            "Creative Studio",
            "Los Angeles, CA",
            EmploymentType::FullTime,
            "Design intuitive and beautiful user interfaces for web and mobile apps.",
            &["Figma", "Prototyping", "User Flows", "HTML/CSS knowledge", "Design Systems"],
            "$100k - $130k",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_five_jobs() {
        let jobs = default_jobs();
        assert_eq!(jobs.len(), 5);
    }

    #[test]
    fn test_default_jobs_all_carry_requirements_and_salary() {
        for job in default_jobs() {
            assert!(!job.requirements.is_empty(), "{} has no requirements", job.title);
            assert!(job.salary_range.is_some(), "{} has no salary range", job.title);
        }
    }

    #[test]
    fn test_default_job_titles_are_unique() {
        let jobs = default_jobs();
        let mut titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), jobs.len());
    }
}
