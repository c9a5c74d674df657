use crate::cv::document::{is_filled, Attachment, CvDocument, DegreeRecord};

/// Renders a CV as a Markdown document. Empty sections are omitted.
pub fn render_cv_to_md(doc: &CvDocument) -> String {
    let mut md = String::new();
    let b = &doc.basic_details;

    let name = if is_filled(&b.full_name) {
        b.full_name.trim()
    } else {
        "Curriculum Vitae"
    };
    md.push_str(&format!("# {name}\n\n"));
    let contact: Vec<&str> = [&b.email, &b.phone, &b.city, &b.address]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !contact.is_empty() {
        md.push_str(&format!("{}\n\n", contact.join(" · ")));
    }
    field(&mut md, "Medical School", &b.medical_school);
    field(&mut md, "Graduation Year", &b.graduation_year);
    field(&mut md, "Nationality", &b.nationality);
    field(&mut md, "USMLE ID", &b.usmle_id);
    if !b.languages.is_empty() {
        let langs: Vec<String> = b
            .languages
            .iter()
            .map(|l| format!("{} ({})", l.language, l.fluency))
            .collect();
        md.push_str(&format!("- **Languages:** {}\n", langs.join(", ")));
    }
    md.push('\n');

    let e = &doc.education;
    let mut edu = String::new();
    degree(&mut edu, "Postgraduate", &e.post_graduation);
    degree(&mut edu, "Medical Degree", &e.graduation);
    if is_filled(&e.college.college_name) {
        let c = &e.college;
        edu.push_str(&format!(
            "- **College:** {}, {} ({}) {}\n",
            c.college_name, c.city, c.stream, c.passing_year
        ));
    }
    if is_filled(&e.schooling.school_name) {
        let s = &e.schooling;
        edu.push_str(&format!(
            "- **School:** {}, {} ({}) {}\n",
            s.school_name, s.city, s.board, s.passing_year
        ));
    }
    section(&mut md, "Education", &edu);

    let u = &doc.usmle_scores;
    let mut usmle = String::new();
    if let Some(status) = u.step1_status {
        usmle.push_str(&format!("- **Step 1:** {}\n", status.label()));
    }
    field(&mut usmle, "Step 2 CK", &u.step2ck_score);
    field(&mut usmle, "Step 2 CS", &u.step2cs_status);
    field(&mut usmle, "OET", &u.oet_score);
    if u.ecfmg_certified {
        usmle.push_str("- ECFMG certified\n");
    }
    section(&mut md, "USMLE", &usmle);

    let clinical: Vec<String> = doc
        .us_clinical_experience
        .list
        .iter()
        .map(|x| {
            let end = if x.current { "Present" } else { x.end_date.as_str() };
            format!(
                "- **{}**, {} ({} – {}){}",
                x.role,
                x.institution,
                x.start_date,
                end,
                link(&x.attachment)
            )
        })
        .collect();
    section(&mut md, "US Clinical Experience", &clinical.join("\n"));

    let mut skills = String::new();
    if is_filled(&doc.skills.skills_list) {
        skills.push_str(&format!("{}\n", doc.skills.skills_list.trim()));
    }
    for d in &doc.skills.supporting_documents {
        skills.push_str(&format!("- {}{}\n", d.name, link(&d.attachment)));
    }
    section(&mut md, "Skills", &skills);

    section(
        &mut md,
        "Significant Achievements",
        doc.significant_achievements.trim(),
    );
    list(&mut md, "Achievements", &doc.achievements, |a| {
        format!("{} ({}){}", a.title, a.year, link(&a.attachment))
    });
    list(&mut md, "Publications", &doc.publications, |p| {
        format!(
            "{}. *{}* {}{}",
            p.title,
            p.journal,
            p.year,
            link(&p.attachment)
        )
    });
    list(&mut md, "Conferences", &doc.conferences, |c| {
        format!("{}, {} ({}){}", c.name, c.role, c.year, link(&c.attachment))
    });
    list(&mut md, "Workshops", &doc.workshops, |w| {
        format!(
            "{}, {} ({}){}",
            w.name,
            w.organizer,
            w.year,
            link(&w.attachment)
        )
    });
    list(
        &mut md,
        "Professional Experience",
        &doc.professional_experiences,
        |p| {
            let end = if p.current { "Present" } else { p.end_date.as_str() };
            format!(
                "**{}**, {} ({} – {})",
                p.position, p.organization, p.start_date, end
            )
        },
    );
    list(&mut md, "Work Experience", &doc.work_experience, |w| {
        let end = if w.current { "Present" } else { w.end_date.as_str() };
        format!(
            "**{}**, {} ({} – {})",
            w.job_title, w.employer, w.start_date, end
        )
    });
    list(
        &mut md,
        "Volunteer Experience",
        &doc.volunteer_experiences,
        |v| {
            format!(
                "**{}**, {} ({} – {})",
                v.role, v.organization, v.start_date, v.end_date
            )
        },
    );

    let t = &doc.emr_rcm_training;
    let mut emr = String::new();
    if !t.emr_systems.is_empty() {
        let systems: Vec<&str> = t.emr_systems.iter().map(String::as_str).collect();
        emr.push_str(&format!("- **EMR Systems:** {}\n", systems.join(", ")));
    }
    if t.rcm_training {
        emr.push_str("- RCM training completed\n");
    }
    field(&mut emr, "Duration", &t.duration);
    section(&mut md, "EMR & RCM Training", &emr);

    let a = &doc.acls_bls;
    let mut certs = String::new();
    if a.acls_certified {
        certs.push_str(&format!(
            "- ACLS ({} – {})\n",
            a.acls_issue_date, a.acls_expiry_date
        ));
    }
    if a.bls_certified {
        certs.push_str(&format!("- BLS ({} – {})\n", a.bls_issue_date, a.bls_expiry_date));
    }
    if !certs.is_empty() {
        field(&mut certs, "Provider", &a.provider);
    }
    section(&mut md, "ACLS / BLS", &certs);

    md
}

fn field(out: &mut String, label: &str, value: &str) {
    if is_filled(value) {
        out.push_str(&format!("- **{label}:** {}\n", value.trim()));
    }
}

fn degree(out: &mut String, label: &str, d: &DegreeRecord) {
    if is_filled(&d.university_name) {
        out.push_str(&format!(
            "- **{label}:** {} {}, {} ({} – {}) {}\n",
            d.degree, d.university_name, d.country, d.start_year, d.end_year, d.grade
        ));
    }
}

fn link(attachment: &Option<Attachment>) -> String {
    attachment
        .as_ref()
        .map(|a| format!(" [document]({})", a.url))
        .unwrap_or_default()
}

fn section(out: &mut String, title: &str, body: &str) {
    let body = body.trim_end();
    if body.is_empty() {
        return;
    }
    out.push_str(&format!("## {title}\n\n{body}\n\n"));
}

fn list<T>(out: &mut String, title: &str, items: &[T], line: impl Fn(&T) -> String) {
    let body: Vec<String> = items.iter().map(|i| format!("- {}", line(i))).collect();
    section(out, title, &body.join("\n"));
}
