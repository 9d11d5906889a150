use leptos::{ev::SubmitEvent, prelude::*, task::spawn_local};
use records::{
    MAX_LEVEL, MIN_LEVEL,
    models::{Appointment, Doctor, Track},
    payloads::{AppointmentRequest, TrackRequest},
};

use crate::{
    alert,
    api::{API_BASE_URL, ApiClient},
    console_error,
    session::Session,
};

const DEFAULT_LEVEL: u8 = 5;

async fn refresh_doctors(client: ApiClient, set: WriteSignal<Vec<Doctor>>) {
    match client.doctors().await {
        Ok(doctors) => set.set(doctors),
        Err(e) => console_error(&format!("Error fetching doctors: {e}")),
    }
}

async fn refresh_appointments(client: ApiClient, set: WriteSignal<Vec<Appointment>>) {
    match client.appointments().await {
        Ok(appointments) => set.set(appointments),
        Err(e) => console_error(&format!("Error fetching appointments: {e}")),
    }
}

async fn refresh_tracks(client: ApiClient, set: WriteSignal<Vec<Track>>) {
    match client.tracks().await {
        Ok(tracks) => set.set(tracks),
        Err(e) => console_error(&format!("Error fetching track entries: {e}")),
    }
}

fn parse_level(raw: &str) -> u8 {
    raw.parse()
        .ok()
        .filter(|level| (MIN_LEVEL..=MAX_LEVEL).contains(level))
        .unwrap_or(DEFAULT_LEVEL)
}

#[component]
pub fn Dashboard(session: Session, on_logout: Callback<()>) -> impl IntoView {
    let client = ApiClient::new(API_BASE_URL, Some(&session));
    let user_name = session.user.name.clone();

    let (doctors, set_doctors) = signal(Vec::<Doctor>::new());
    let (appointments, set_appointments) = signal(Vec::<Appointment>::new());
    let (tracks, set_tracks) = signal(Vec::<Track>::new());

    let (doctor_name, set_doctor_name) = signal(String::new());
    let (date, set_date) = signal(String::new());
    let (time, set_time) = signal(String::new());
    let (booking, set_booking) = signal(false);

    let (pain_level, set_pain_level) = signal(DEFAULT_LEVEL);
    let (energy_level, set_energy_level) = signal(DEFAULT_LEVEL);
    let (notes, set_notes) = signal(String::new());
    let (saving, set_saving) = signal(false);

    spawn_local({
        let client = client.clone();
        async move {
            refresh_doctors(client.clone(), set_doctors).await;
            refresh_appointments(client.clone(), set_appointments).await;
            refresh_tracks(client, set_tracks).await;
        }
    });

    let submit_appointment = {
        let client = client.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            set_booking.set(true);

            let client = client.clone();
            let request = AppointmentRequest {
                doctor_name: doctor_name.get_untracked(),
                date: date.get_untracked(),
                time: time.get_untracked(),
            };

            spawn_local(async move {
                match client.create_appointment(&request).await {
                    Ok(_) => {
                        set_doctor_name.set(String::new());
                        set_date.set(String::new());
                        set_time.set(String::new());
                        refresh_appointments(client, set_appointments).await;
                        alert("Appointment booked successfully! Treatment plan generated.");
                    }
                    Err(e) => alert(&e.0),
                }

                set_booking.set(false);
            });
        }
    };

    let submit_track = move |ev: SubmitEvent| {
        ev.prevent_default();
        set_saving.set(true);

        let client = client.clone();
        let request = TrackRequest {
            pain_level: pain_level.get_untracked(),
            energy_level: energy_level.get_untracked(),
            notes: notes.get_untracked(),
        };

        spawn_local(async move {
            match client.create_track(&request).await {
                Ok(_) => {
                    set_pain_level.set(DEFAULT_LEVEL);
                    set_energy_level.set(DEFAULT_LEVEL);
                    set_notes.set(String::new());
                    refresh_tracks(client, set_tracks).await;
                    alert("Health entry saved successfully!");
                }
                Err(e) => alert(&e.0),
            }

            set_saving.set(false);
        });
    };

    let latest_plan = move || {
        appointments.with(|appointments| {
            appointments
                .first()
                .map(|appointment| appointment.treatment_plan.clone())
        })
    };

    view! {
        <header class="dashboard-header">
            <h1>"Welcome, " {user_name}</h1>
            <button on:click=move |_| on_logout.run(())>"Logout"</button>
        </header>

        <div class="dashboard-grid">
            <section class="card">
                <h3>"Book Appointment"</h3>
                <form on:submit=submit_appointment>
                    <label>
                        "Doctor"
                        <select
                            required
                            prop:value=move || doctor_name.get()
                            on:change=move |ev| set_doctor_name.set(event_target_value(&ev))
                        >
                            <option value="">"Select a doctor"</option>
                            {move || {
                                doctors
                                    .get()
                                    .into_iter()
                                    .map(|doctor| {
                                        let label = format!("{} ({})", doctor.name, doctor.specialty);
                                        view! { <option value=doctor.name>{label}</option> }
                                    })
                                    .collect_view()
                            }}
                        </select>
                    </label>
                    <label>
                        "Date"
                        <input
                            type="date"
                            required
                            prop:value=move || date.get()
                            on:input=move |ev| set_date.set(event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Time"
                        <input
                            type="time"
                            required
                            prop:value=move || time.get()
                            on:input=move |ev| set_time.set(event_target_value(&ev))
                        />
                    </label>
                    <button type="submit" disabled=move || booking.get()>
                        {move || if booking.get() { "Booking..." } else { "Book Appointment" }}
                    </button>
                </form>
            </section>

            <section class="card">
                <h3>"Latest Treatment Plan"</h3>
                {move || match latest_plan() {
                    Some(plan) => {
                        view! {
                            <dl>
                                <dt>"Diagnosis"</dt>
                                <dd>{plan.diagnosis}</dd>
                                <dt>"Recommended Medicines"</dt>
                                <dd>
                                    <ul>
                                        {plan
                                            .recommended_medicines
                                            .into_iter()
                                            .map(|medicine| view! { <li>{medicine}</li> })
                                            .collect_view()}
                                    </ul>
                                </dd>
                                <dt>"Lifestyle Advice"</dt>
                                <dd>{plan.lifestyle_advice}</dd>
                            </dl>
                        }
                            .into_any()
                    }
                    None => view! { <p>"Book an appointment to get a treatment plan."</p> }.into_any(),
                }}
            </section>

            <section class="card">
                <h3>"Health Tracking"</h3>
                <form on:submit=submit_track>
                    <label>
                        {move || format!("Pain Level: {}", pain_level.get())}
                        <input
                            type="range"
                            min=MIN_LEVEL.to_string()
                            max=MAX_LEVEL.to_string()
                            prop:value=move || pain_level.get().to_string()
                            on:input=move |ev| set_pain_level.set(parse_level(&event_target_value(&ev)))
                        />
                    </label>
                    <label>
                        {move || format!("Energy Level: {}", energy_level.get())}
                        <input
                            type="range"
                            min=MIN_LEVEL.to_string()
                            max=MAX_LEVEL.to_string()
                            prop:value=move || energy_level.get().to_string()
                            on:input=move |ev| set_energy_level.set(parse_level(&event_target_value(&ev)))
                        />
                    </label>
                    <label>
                        "Notes"
                        <textarea
                            rows="3"
                            placeholder="How are you feeling today?"
                            prop:value=move || notes.get()
                            on:input=move |ev| set_notes.set(event_target_value(&ev))
                        ></textarea>
                    </label>
                    <button type="submit" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Save Entry" }}
                    </button>
                </form>
            </section>

            <section class="card">
                <h3>"Your Appointments"</h3>
                <Show
                    when=move || appointments.with(|appointments| !appointments.is_empty())
                    fallback=|| view! { <p>"No appointments yet."</p> }
                >
                    <ul class="history">
                        {move || {
                            appointments
                                .get()
                                .into_iter()
                                .map(|appointment| {
                                    view! {
                                        <li>
                                            <strong>{appointment.doctor_name}</strong>
                                            <span>{format!("{} at {}", appointment.date, appointment.time)}</span>
                                            <em>{appointment.treatment_plan.diagnosis}</em>
                                        </li>
                                    }
                                })
                                .collect_view()
                        }}
                    </ul>
                </Show>
            </section>

            <section class="card">
                <h3>"Health History"</h3>
                <Show
                    when=move || tracks.with(|tracks| !tracks.is_empty())
                    fallback=|| view! { <p>"No entries yet."</p> }
                >
                    <ul class="history">
                        {move || {
                            tracks
                                .get()
                                .into_iter()
                                .map(|track| {
                                    view! {
                                        <li>
                                            <span>
                                                {format!(
                                                    "Pain {} / Energy {}",
                                                    track.pain_level,
                                                    track.energy_level,
                                                )}
                                            </span>
                                            <time>{track.created_at.format("%Y-%m-%d %H:%M").to_string()}</time>
                                            <p>{track.notes}</p>
                                        </li>
                                    }
                                })
                                .collect_view()
                        }}
                    </ul>
                </Show>
            </section>
        </div>
    }
}
