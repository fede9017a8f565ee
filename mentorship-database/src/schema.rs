diesel::table! {
    credentials (id) {
        id -> Int4,
        #[max_length = 150]
        username -> Varchar,
        #[max_length = 128]
        password_hash -> Varchar,
    }
}

diesel::table! {
    auth_token (key) {
        #[max_length = 40]
        key -> Varchar,
        credentials_id -> Int4,
        created -> Timestamptz,
    }
}

diesel::table! {
    permission_group (id) {
        id -> Int4,
        #[max_length = 150]
        name -> Varchar,
    }
}

diesel::table! {
    permission_group_member (group_id, credentials_id) {
        group_id -> Int4,
        credentials_id -> Int4,
    }
}

diesel::table! {
    #[sql_name = "Skill"]
    skills (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        level -> Int2,
    }
}

diesel::table! {
    #[sql_name = "Subject"]
    subjects (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
    }
}

diesel::table! {
    #[sql_name = "Group"]
    academic_groups (id) {
        id -> Int4,
        #[max_length = 30]
        name -> Varchar,
    }
}

diesel::table! {
    #[sql_name = "Curator"]
    curators (id) {
        id -> Int4,
        #[max_length = 35]
        name -> Varchar,
        #[max_length = 35]
        last_name -> Varchar,
        #[max_length = 35]
        patronymic -> Varchar,
        #[max_length = 200]
        description -> Varchar,
        credentials_id -> Nullable<Int4>,
    }
}

diesel::table! {
    #[sql_name = "Student"]
    students (id) {
        id -> Int4,
        #[max_length = 35]
        name -> Varchar,
        #[max_length = 35]
        last_name -> Varchar,
        #[max_length = 35]
        patronymic -> Varchar,
        #[max_length = 200]
        description -> Varchar,
        credentials_id -> Nullable<Int4>,
        course_number -> Int2,
        group_id -> Nullable<Int4>,
    }
}

diesel::table! {
    #[sql_name = "Curator_skills"]
    curator_skills (curator_id, skill_id) {
        curator_id -> Int4,
        skill_id -> Int4,
    }
}

diesel::table! {
    #[sql_name = "Student_skills"]
    student_skills (student_id, skill_id) {
        student_id -> Int4,
        skill_id -> Int4,
    }
}

diesel::table! {
    #[sql_name = "Theme"]
    themes (id) {
        id -> Int4,
        curator_id -> Nullable<Int4>,
        student_id -> Nullable<Int4>,
        subject_id -> Int4,
        #[max_length = 100]
        title -> Varchar,
        #[max_length = 250]
        description -> Varchar,
        date_creation -> Timestamptz,
        date_acceptance -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    #[sql_name = "Theme_skills"]
    theme_skills (theme_id, skill_id) {
        theme_id -> Int4,
        skill_id -> Int4,
    }
}

diesel::table! {
    #[sql_name = "Suggestion_theme_status"]
    suggestion_statuses (id) {
        id -> Int4,
        #[max_length = 50]
        name -> Varchar,
    }
}

diesel::table! {
    #[sql_name = "Suggestion_theme_progress"]
    suggestion_progresses (id) {
        id -> Int4,
        #[max_length = 100]
        title -> Varchar,
        #[max_length = 250]
        description -> Varchar,
        date_update -> Timestamptz,
    }
}

diesel::table! {
    #[sql_name = "Suggestion_theme"]
    suggestions (id) {
        id -> Int4,
        theme_id -> Int4,
        student_id -> Nullable<Int4>,
        curator_id -> Nullable<Int4>,
        status_id -> Int4,
        progress_id -> Nullable<Int4>,
        date_creation -> Timestamptz,
    }
}

diesel::table! {
    #[sql_name = "Suggestion_theme_comment"]
    suggestion_comments (id) {
        id -> Int4,
        suggestion_id -> Int4,
        #[max_length = 100]
        author_name -> Varchar,
        #[max_length = 500]
        content -> Varchar,
        date_creation -> Timestamptz,
    }
}

diesel::table! {
    #[sql_name = "Work"]
    works (id) {
        id -> Int4,
        theme_id -> Int4,
        date_start -> Timestamptz,
        date_finish -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    #[sql_name = "Work_step_status"]
    work_step_statuses (id) {
        id -> Int4,
        #[max_length = 50]
        name -> Varchar,
    }
}

diesel::table! {
    #[sql_name = "Work_step"]
    work_steps (id) {
        id -> Int4,
        work_id -> Int4,
        status_id -> Int4,
        #[max_length = 100]
        title -> Varchar,
        #[max_length = 250]
        description -> Varchar,
        date_start -> Timestamptz,
        date_finish -> Timestamptz,
    }
}

diesel::table! {
    #[sql_name = "Work_step_comment"]
    work_step_comments (id) {
        id -> Int4,
        work_step_id -> Int4,
        #[max_length = 100]
        author_name -> Varchar,
        #[max_length = 500]
        content -> Varchar,
        date_creation -> Timestamptz,
    }
}

diesel::table! {
    #[sql_name = "Work_step_material"]
    work_step_materials (id) {
        id -> Int4,
        step_id -> Int4,
        #[max_length = 200]
        content -> Varchar,
    }
}

diesel::joinable!(auth_token -> credentials (credentials_id));
diesel::joinable!(permission_group_member -> credentials (credentials_id));
diesel::joinable!(permission_group_member -> permission_group (group_id));
diesel::joinable!(students -> academic_groups (group_id));
diesel::joinable!(curator_skills -> curators (curator_id));
diesel::joinable!(curator_skills -> skills (skill_id));
diesel::joinable!(student_skills -> students (student_id));
diesel::joinable!(student_skills -> skills (skill_id));
diesel::joinable!(themes -> subjects (subject_id));
diesel::joinable!(theme_skills -> themes (theme_id));
diesel::joinable!(theme_skills -> skills (skill_id));
diesel::joinable!(suggestions -> themes (theme_id));
diesel::joinable!(suggestions -> suggestion_statuses (status_id));
diesel::joinable!(suggestions -> suggestion_progresses (progress_id));
diesel::joinable!(suggestion_comments -> suggestions (suggestion_id));
diesel::joinable!(works -> themes (theme_id));
diesel::joinable!(work_steps -> works (work_id));
diesel::joinable!(work_steps -> work_step_statuses (status_id));
diesel::joinable!(work_step_comments -> work_steps (work_step_id));
diesel::joinable!(work_step_materials -> work_steps (step_id));

diesel::allow_tables_to_appear_in_same_query!(
    academic_groups,
    auth_token,
    credentials,
    curator_skills,
    curators,
    permission_group,
    permission_group_member,
    skills,
    student_skills,
    students,
    subjects,
    suggestion_comments,
    suggestion_progresses,
    suggestion_statuses,
    suggestions,
    theme_skills,
    themes,
    work_step_comments,
    work_step_materials,
    work_step_statuses,
    work_steps,
    works,
);
