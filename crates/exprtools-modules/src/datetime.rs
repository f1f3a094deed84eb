//! Date and time types: `System.DateTime`, `System.DateTimeOffset` and
//! `System.TimeSpan`.
//!
//! Values are tick based (see [`exprtools_core::time`]). Calendar fields
//! outside chrono's range read as zero.

use chrono::NaiveDate;
use exprtools_core::time::{DateTime, DateTimeOffset, TimeSpan};
use exprtools_core::{CallContext, DataType, EvalError, Value};
use exprtools_registry::{Module, TypeBuilder};

fn this_date_time(ctx: &CallContext) -> Result<DateTime, EvalError> {
    match ctx.this()? {
        Value::DateTime(value) => Ok(*value),
        other => Err(EvalError::type_mismatch("DateTime", other.type_name())),
    }
}

fn this_offset(ctx: &CallContext) -> Result<DateTimeOffset, EvalError> {
    match ctx.this()? {
        Value::DateTimeOffset(value) => Ok(*value),
        other => Err(EvalError::type_mismatch("DateTimeOffset", other.type_name())),
    }
}

fn this_time_span(ctx: &CallContext) -> Result<TimeSpan, EvalError> {
    match ctx.this()? {
        Value::TimeSpan(value) => Ok(*value),
        other => Err(EvalError::type_mismatch("TimeSpan", other.type_name())),
    }
}

fn arg_time_span(ctx: &CallContext, index: usize) -> Result<TimeSpan, EvalError> {
    match ctx.arg(index)? {
        Value::TimeSpan(value) => Ok(*value),
        other => Err(EvalError::type_mismatch("TimeSpan", other.type_name())),
    }
}

/// Midnight of the given calendar day.
pub fn from_ymd(year: i64, month: i64, day: i64) -> Result<DateTime, EvalError> {
    let date = i32::try_from(year)
        .ok()
        .zip(u32::try_from(month).ok())
        .zip(u32::try_from(day).ok())
        .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d))
        .ok_or_else(|| EvalError::Native(format!("invalid date {year}-{month}-{day}")))?;
    Ok(DateTime::from_naive(date.and_time(Default::default())))
}

fn date_time() -> TypeBuilder {
    let date_time = DataType::date_time;
    let mut builder = TypeBuilder::new("DateTime")
        .static_property("Now", date_time(), |ctx| {
            ctx.set_return(DateTime::now());
            Ok(())
        })
        .static_property("UtcNow", date_time(), |ctx| {
            ctx.set_return(DateTime::utc_now());
            Ok(())
        })
        .static_property("Today", date_time(), |ctx| {
            ctx.set_return(DateTime::today());
            Ok(())
        })
        .static_property("MinValue", date_time(), |ctx| {
            ctx.set_return(DateTime::MIN);
            Ok(())
        })
        .constructor(vec![DataType::int64()], |ctx| {
            let ticks = ctx.arg_i64(0)?;
            ctx.set_return(DateTime::from_ticks(ticks));
            Ok(())
        })
        .constructor(vec![DataType::int32(); 3], |ctx| {
            let value = from_ymd(ctx.arg_i64(0)?, ctx.arg_i64(1)?, ctx.arg_i64(2)?)?;
            ctx.set_return(value);
            Ok(())
        })
        .property("Ticks", DataType::int64(), |ctx| {
            let ticks = this_date_time(ctx)?.ticks;
            ctx.set_return(ticks);
            Ok(())
        })
        .property("Date", date_time(), |ctx| {
            let date = this_date_time(ctx)?.date();
            ctx.set_return(date);
            Ok(())
        })
        .property("Year", DataType::int32(), |ctx| {
            let year = this_date_time(ctx)?.year().unwrap_or(0);
            ctx.set_return(year);
            Ok(())
        });

    let fields: [(&'static str, fn(&DateTime) -> Option<u32>); 5] = [
        ("Month", DateTime::month),
        ("Day", DateTime::day),
        ("Hour", DateTime::hour),
        ("Minute", DateTime::minute),
        ("Second", DateTime::second),
    ];
    for (name, field) in fields {
        builder = builder.property(name, DataType::int32(), move |ctx| {
            let value = field(&this_date_time(ctx)?).unwrap_or(0) as i32;
            ctx.set_return(value);
            Ok(())
        });
    }
    builder
}

fn date_time_offset() -> TypeBuilder {
    TypeBuilder::new("DateTimeOffset")
        .static_property("Now", DataType::date_time_offset(), |ctx| {
            ctx.set_return(Value::DateTimeOffset(DateTimeOffset::now()));
            Ok(())
        })
        .constructor(vec![DataType::int64(), DataType::time_span()], |ctx| {
            let value = DateTimeOffset::new(ctx.arg_i64(0)?, arg_time_span(ctx, 1)?);
            ctx.set_return(Value::DateTimeOffset(value));
            Ok(())
        })
        .property("Ticks", DataType::int64(), |ctx| {
            let ticks = this_offset(ctx)?.ticks;
            ctx.set_return(ticks);
            Ok(())
        })
        .property("Offset", DataType::time_span(), |ctx| {
            let offset = this_offset(ctx)?.offset;
            ctx.set_return(Value::TimeSpan(offset));
            Ok(())
        })
        .property("DateTime", DataType::date_time(), |ctx| {
            let value = this_offset(ctx)?.date_time();
            ctx.set_return(value);
            Ok(())
        })
        .property("UtcDateTime", DataType::date_time(), |ctx| {
            let value = this_offset(ctx)?.utc_date_time();
            ctx.set_return(value);
            Ok(())
        })
}

fn time_span() -> TypeBuilder {
    TypeBuilder::new("TimeSpan")
        .static_property("Zero", DataType::time_span(), |ctx| {
            ctx.set_return(Value::TimeSpan(TimeSpan::ZERO));
            Ok(())
        })
        .static_method("FromSeconds", vec![DataType::double()], DataType::time_span(), |ctx| {
            let seconds = ctx.arg_f64(0)?;
            ctx.set_return(Value::TimeSpan(TimeSpan::from_seconds(seconds)));
            Ok(())
        })
        .constructor(vec![DataType::int64()], |ctx| {
            let ticks = ctx.arg_i64(0)?;
            ctx.set_return(Value::TimeSpan(TimeSpan::from_ticks(ticks)));
            Ok(())
        })
        .property("Ticks", DataType::int64(), |ctx| {
            let ticks = this_time_span(ctx)?.ticks;
            ctx.set_return(ticks);
            Ok(())
        })
        .property("TotalSeconds", DataType::double(), |ctx| {
            let seconds = this_time_span(ctx)?.total_seconds();
            ctx.set_return(seconds);
            Ok(())
        })
        .property("TotalDays", DataType::double(), |ctx| {
            let days = this_time_span(ctx)?.total_days();
            ctx.set_return(days);
            Ok(())
        })
}

/// Creates the module holding the date and time types.
pub fn module() -> Module {
    Module::new("System")
        .ty(date_time())
        .ty(date_time_offset())
        .ty(time_span())
}
